//! Storage port for persisted locations.
//! Implemented by stowage_postgres and by `InMemoryLocationStore`; the
//! orchestrator depends only on this trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::LocationError;
use crate::location::{NewLocation, StorageLocation};

pub type Result<T> = std::result::Result<T, LocationError>;

#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<StorageLocation>>;

    /// Which of `names` already exist. Name uniqueness is global.
    async fn existing_names(&self, names: &[String]) -> Result<Vec<String>>;

    /// Materialized path of a location, or `None` if it does not exist.
    async fn hierarchy_path_of(&self, id: Uuid) -> Result<Option<String>> {
        Ok(self.get_by_id(id).await?.map(|loc| loc.location_hierarchy))
    }

    /// Insert every row or none of them.
    ///
    /// Implementations must re-check name collisions inside the same atomic
    /// unit as the insert and report them as `DuplicateNames`; a unique
    /// constraint tripped at commit time is reported as
    /// `ConstraintViolation`. Returns ids in input order.
    async fn insert_batch(&self, batch: &[NewLocation]) -> Result<Vec<Uuid>>;
}
