//! In-memory `LocationStore` for tests and for running the server without
//! a database. The collision re-check and the insert share one write lock,
//! which gives the same all-or-nothing guarantee as a transaction.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::LocationError;
use crate::location::{NewLocation, StorageLocation};
use crate::ports::{LocationStore, Result};

#[derive(Default)]
struct State {
    rows: HashMap<Uuid, StorageLocation>,
    by_name: HashMap<String, Uuid>,
}

#[derive(Default)]
pub struct InMemoryLocationStore {
    state: RwLock<State>,
}

impl InMemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// All names, sorted. Handy for asserting a store did not change.
    pub async fn names(&self) -> Vec<String> {
        let state = self.state.read().await;
        let mut names: Vec<String> = state.by_name.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<StorageLocation>> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn existing_names(&self, names: &[String]) -> Result<Vec<String>> {
        let state = self.state.read().await;
        Ok(names
            .iter()
            .filter(|n| state.by_name.contains_key(n.as_str()))
            .cloned()
            .collect())
    }

    async fn insert_batch(&self, batch: &[NewLocation]) -> Result<Vec<Uuid>> {
        let mut state = self.state.write().await;

        let existing: Vec<String> = batch
            .iter()
            .filter(|row| state.by_name.contains_key(&row.name))
            .map(|row| row.name.clone())
            .collect();
        if !existing.is_empty() {
            return Err(LocationError::DuplicateNames(existing));
        }

        let mut seen = HashSet::with_capacity(batch.len());
        for row in batch {
            if !seen.insert(row.name.as_str()) {
                return Err(LocationError::ConstraintViolation(row.name.clone()));
            }
            if let Some(parent_id) = row.parent_id {
                if !state.rows.contains_key(&parent_id) {
                    return Err(LocationError::ParentNotFound(parent_id));
                }
            }
        }

        let now = Utc::now();
        let mut ids = Vec::with_capacity(batch.len());
        for row in batch {
            state.by_name.insert(row.name.clone(), row.id);
            state.rows.insert(
                row.id,
                StorageLocation {
                    id: row.id,
                    name: row.name.clone(),
                    location_type: row.location_type,
                    parent_id: row.parent_id,
                    location_hierarchy: row.location_hierarchy.clone(),
                    single_part_only: row.single_part_only,
                    layout_config: Some(row.layout_config.clone()),
                    created_by: Some(row.created_by.clone()),
                    created_at: now,
                    updated_at: now,
                },
            );
            ids.push(row.id);
        }
        Ok(ids)
    }
}
