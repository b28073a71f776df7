//! Router construction for the stowage server.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware as axum_mw,
    routing::{get, post},
    Extension, Router,
};
use stowage_core::service::LocationService;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::handlers;
use crate::middleware::jwt::{jwt_auth, JwtConfig};

/// Build the full axum router with all routes and middleware.
pub fn build_router(
    service: Arc<dyn LocationService>,
    jwt_config: JwtConfig,
    request_timeout: Duration,
) -> Router {
    // Routes that require JWT authentication
    let protected = Router::new()
        .route(
            "/api/storage-locations/bulk-create",
            post(handlers::locations::bulk_create),
        )
        .layer(axum_mw::from_fn(jwt_auth))
        .layer(Extension(jwt_config));

    // Public routes (no auth)
    let public = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/storage-locations/preview",
            post(handlers::locations::preview),
        )
        .route(
            "/api/storage-locations/:id",
            get(handlers::locations::get_location),
        );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(Extension(service))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
