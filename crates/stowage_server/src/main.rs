//! stowage-server: REST server for storage location layouts.
//!
//! Reads config from env vars (a `.env` file is honoured):
//!   STOWAGE_STORE               : `postgres` (default) or `memory`
//!   STOWAGE_DATABASE_URL        : Postgres connection string (required for postgres)
//!   STOWAGE_DB_POOL_SIZE        : max pool connections (default: 10)
//!   STOWAGE_JWT_SECRET          : JWT HMAC secret (required)
//!   STOWAGE_BIND_ADDR           : listen address (default: 0.0.0.0:4200)
//!   STOWAGE_REQUEST_TIMEOUT_SECS: per-request timeout (default: 30)

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use stowage_core::ports::LocationStore;
use stowage_core::service::{LocationService, LocationServiceImpl};
use stowage_core::InMemoryLocationStore;
use stowage_postgres::PgLocationStore;
use stowage_server::config::{ServerConfig, StoreBackend};
use stowage_server::middleware::jwt::JwtConfig;
use stowage_server::router::build_router;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,stowage_server=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let store: Arc<dyn LocationStore> = match config.store {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("STOWAGE_DATABASE_URL must be set")?;
            let pool = PgPoolOptions::new()
                .max_connections(config.db_pool_size)
                .connect(database_url)
                .await
                .context("failed to connect to database")?;
            tracing::info!("Connected to database");

            let store = PgLocationStore::new(pool);
            store.ensure_schema().await?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; locations are lost on restart");
            Arc::new(InMemoryLocationStore::new())
        }
    };

    let service: Arc<dyn LocationService> = Arc::new(LocationServiceImpl::new(store));
    let jwt_config = JwtConfig::from_secret(config.jwt_secret.as_bytes());
    let app = build_router(service, jwt_config, config.request_timeout);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("stowage-server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
