//! Postgres implementation of the `LocationStore` port.
//!
//! All SQL is runtime-checked (sqlx::query, not sqlx::query!) so the crate
//! builds without a live database.

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use stowage_core::error::LocationError;
use stowage_core::location::{NewLocation, StorageLocation};
use stowage_core::ports::{LocationStore, Result};

use crate::sqlx_types::PgLocationRow;

const SCHEMA_SQL: &str = include_str!("../migrations/001_storage_locations.sql");

/// Postgres-backed location store.
pub struct PgLocationStore {
    pool: PgPool,
}

impl PgLocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `storage_locations` table if it is missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!(e))?;
        Ok(())
    }
}

/// Map a write failure onto the domain error. A unique violation is the
/// duplicate outcome whether it surfaces at `INSERT` or at `COMMIT`.
fn map_write_error(e: sqlx::Error, name: &str, parent_id: Option<Uuid>) -> LocationError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return LocationError::ConstraintViolation(name.to_string());
        }
        if db.is_foreign_key_violation() {
            if let Some(parent_id) = parent_id {
                return LocationError::ParentNotFound(parent_id);
            }
        }
    }
    LocationError::Internal(anyhow!(e))
}

fn map_insert_error(e: sqlx::Error, row: &NewLocation) -> LocationError {
    map_write_error(e, &row.name, row.parent_id)
}

/// Deferred constraints report at commit without naming the row.
fn map_commit_error(e: sqlx::Error, batch: &[NewLocation]) -> LocationError {
    let parent_id = batch.first().and_then(|row| row.parent_id);
    map_write_error(e, COMMIT_CONFLICT, parent_id)
}

const COMMIT_CONFLICT: &str = "a name in the batch (detected at commit)";

#[async_trait]
impl LocationStore for PgLocationStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<StorageLocation>> {
        let row = sqlx::query_as::<_, PgLocationRow>(
            r#"
            SELECT id, name, location_type, parent_id, location_hierarchy,
                   single_part_only, layout_config, created_by,
                   created_at, updated_at
            FROM storage_locations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!(e))?;
        row.map(|r| {
            r.try_into()
                .map_err(|e: String| LocationError::Internal(anyhow!(e)))
        })
        .transpose()
    }

    async fn existing_names(&self, names: &[String]) -> Result<Vec<String>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let found: Vec<String> =
            sqlx::query_scalar("SELECT name FROM storage_locations WHERE name = ANY($1)")
                .bind(names)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| anyhow!(e))?;
        Ok(in_request_order(names, found))
    }

    async fn insert_batch(&self, batch: &[NewLocation]) -> Result<Vec<Uuid>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let names: Vec<String> = batch.iter().map(|r| r.name.clone()).collect();

        let mut tx = self.pool.begin().await.map_err(|e| anyhow!(e))?;

        // One lock per distinct name hash, taken in key order so two
        // overlapping batches cannot deadlock. Released at commit/rollback.
        sqlx::query(
            r#"
            SELECT pg_advisory_xact_lock(k)
            FROM (
                SELECT DISTINCT hashtextextended(n, 0) AS k
                FROM unnest($1::text[]) AS n
                ORDER BY k
            ) keys
            "#,
        )
        .bind(&names)
        .execute(&mut *tx)
        .await
        .map_err(|e| anyhow!(e))?;

        let taken: Vec<String> =
            sqlx::query_scalar("SELECT name FROM storage_locations WHERE name = ANY($1)")
                .bind(&names)
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| anyhow!(e))?;
        if !taken.is_empty() {
            tracing::debug!(conflicts = taken.len(), "collision found under lock");
            return Err(LocationError::DuplicateNames(in_request_order(
                &names, taken,
            )));
        }

        let mut ids = Vec::with_capacity(batch.len());
        for row in batch {
            let snapshot = serde_json::to_value(&row.layout_config).map_err(|e| anyhow!(e))?;
            sqlx::query(
                r#"
                INSERT INTO storage_locations
                    (id, name, location_type, parent_id, location_hierarchy,
                     single_part_only, layout_config, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(row.id)
            .bind(&row.name)
            .bind(row.location_type.as_str())
            .bind(row.parent_id)
            .bind(&row.location_hierarchy)
            .bind(row.single_part_only)
            .bind(snapshot)
            .bind(&row.created_by)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, row))?;
            ids.push(row.id);
        }

        tx.commit()
            .await
            .map_err(|e| map_commit_error(e, batch))?;
        Ok(ids)
    }
}

/// Reorder `found` to follow `requested`, so conflicts are reported in
/// generation order.
fn in_request_order(requested: &[String], found: Vec<String>) -> Vec<String> {
    let found: std::collections::HashSet<String> = found.into_iter().collect();
    requested
        .iter()
        .filter(|n| found.contains(*n))
        .cloned()
        .collect()
}
