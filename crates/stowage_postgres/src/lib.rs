//! stowage_postgres: PostgreSQL adapter for the stowage_core ports.

pub mod sqlx_types;
pub mod store;

pub use store::PgLocationStore;
