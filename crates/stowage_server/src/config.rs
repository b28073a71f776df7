//! Server configuration read from `STOWAGE_*` environment variables.

use std::time::Duration;

use anyhow::{anyhow, bail, Context};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4200";
pub const DEFAULT_DB_POOL_SIZE: u32 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Which `LocationStore` backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local store; data is lost on restart.
    Memory,
}

impl StoreBackend {
    // Returns None for unknown values rather than an error.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Some(Self::Postgres),
            "memory" | "mem" => Some(Self::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub store: StoreBackend,
    /// Required when `store` is `Postgres`.
    pub database_url: Option<String>,
    pub db_pool_size: u32,
    pub jwt_secret: String,
    pub request_timeout: Duration,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("STOWAGE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());

        let store = match lookup("STOWAGE_STORE") {
            Some(raw) => StoreBackend::from_str(&raw)
                .ok_or_else(|| anyhow!("STOWAGE_STORE must be 'postgres' or 'memory', got '{raw}'"))?,
            None => StoreBackend::Postgres,
        };

        let database_url = lookup("STOWAGE_DATABASE_URL").filter(|s| !s.trim().is_empty());
        if store == StoreBackend::Postgres && database_url.is_none() {
            bail!("STOWAGE_DATABASE_URL must be set when STOWAGE_STORE=postgres");
        }

        let db_pool_size = match lookup("STOWAGE_DB_POOL_SIZE") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("STOWAGE_DB_POOL_SIZE is not a number: '{raw}'"))?,
            None => DEFAULT_DB_POOL_SIZE,
        };

        let jwt_secret = lookup("STOWAGE_JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("STOWAGE_JWT_SECRET must be set"))?;

        let timeout_secs: u64 = match lookup("STOWAGE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("STOWAGE_REQUEST_TIMEOUT_SECS is not a number: '{raw}'"))?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            bind_addr,
            store,
            database_url,
            db_pool_size,
            jwt_secret,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
