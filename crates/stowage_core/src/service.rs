//! LocationService: preview and bulk creation of storage locations.
//!
//! Takes the store via `Arc<dyn LocationStore>` so the same logic runs
//! against Postgres or the in-memory store.
//!
//! ## Bulk creation gates
//!
//! ```text
//! validate ─▶ resolve parent ─▶ generate ─▶ collision check ─▶ insert (atomic)
//!    │              │                             │                 │
//!    └──────────────┴────────── abort, nothing written ─────────────┘
//! ```
//!
//! The full name list is generated before anything is written, so a
//! collision at any position stops the whole batch.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::LocationError;
use crate::layout::{LayoutConfig, LayoutSnapshot};
use crate::location::{hierarchy_path, NewLocation, StorageLocation};
use crate::ports::LocationStore;
use crate::preview;
use crate::principal::Principal;
use crate::proto::{BulkCreateResult, PreviewResult};
use crate::validate::validate;

pub type Result<T> = std::result::Result<T, LocationError>;

#[async_trait]
pub trait LocationService: Send + Sync {
    /// Pure dry run; never touches the store.
    fn preview(&self, config: &LayoutConfig) -> PreviewResult;

    /// Create every location the layout describes, or none.
    async fn bulk_create(
        &self,
        principal: &Principal,
        config: LayoutConfig,
    ) -> Result<BulkCreateResult>;

    async fn get_location(&self, id: Uuid) -> Result<StorageLocation>;
}

pub struct LocationServiceImpl {
    store: Arc<dyn LocationStore>,
}

impl LocationServiceImpl {
    pub fn new(store: Arc<dyn LocationStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LocationService for LocationServiceImpl {
    fn preview(&self, config: &LayoutConfig) -> PreviewResult {
        preview::preview(config)
    }

    async fn bulk_create(
        &self,
        principal: &Principal,
        config: LayoutConfig,
    ) -> Result<BulkCreateResult> {
        // Never trust a client-side preview; validate again.
        let validated = validate(&config);
        if !validated.report.is_valid() {
            tracing::warn!(
                actor = %principal.actor_id,
                total = validated.report.total_count,
                "bulk create rejected by validation"
            );
            return Err(LocationError::Validation(validated.report));
        }
        let plan = validated.plan.ok_or_else(|| {
            LocationError::Internal(anyhow::anyhow!("valid layout produced no plan"))
        })?;

        let parent_path = match config.parent_id {
            Some(parent_id) => Some(
                self.store
                    .hierarchy_path_of(parent_id)
                    .await?
                    .ok_or(LocationError::ParentNotFound(parent_id))?,
            ),
            None => None,
        };

        let names: Vec<String> = plan.names().collect();

        let existing = self.store.existing_names(&names).await?;
        if !existing.is_empty() {
            tracing::warn!(
                actor = %principal.actor_id,
                conflicts = existing.len(),
                "bulk create aborted: names already exist"
            );
            return Err(LocationError::DuplicateNames(existing));
        }

        let snapshot = LayoutSnapshot::capture(&plan, &config);
        let batch: Vec<NewLocation> = names
            .into_iter()
            .map(|name| NewLocation {
                id: Uuid::new_v4(),
                location_hierarchy: hierarchy_path(parent_path.as_deref(), &name),
                name,
                location_type: config.location_type,
                parent_id: config.parent_id,
                single_part_only: config.single_part_only,
                layout_config: snapshot.clone(),
                created_by: principal.actor_id.clone(),
            })
            .collect();

        let ids = match self.store.insert_batch(&batch).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(actor = %principal.actor_id, "bulk create rolled back: {}", e);
                return Err(e);
            }
        };

        tracing::info!(
            actor = %principal.actor_id,
            prefix = %config.prefix,
            layout = %config.layout_type,
            count = ids.len(),
            "bulk created storage locations"
        );
        Ok(BulkCreateResult::created(ids))
    }

    async fn get_location(&self, id: Uuid) -> Result<StorageLocation> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or(LocationError::NotFound(id))
    }
}
