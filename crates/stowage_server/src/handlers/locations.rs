//! Storage location handlers.
//!
//! POST /api/storage-locations/preview       dry run, no auth, no writes
//! POST /api/storage-locations/bulk-create   create a whole layout (JWT)
//! GET  /api/storage-locations/:id           fetch one location

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Extension, Json,
};
use stowage_core::{
    BulkCreateResult, LayoutConfig, LocationError, LocationService, PreviewResult, Principal,
    StorageLocation,
};
use uuid::Uuid;

use crate::error::{status_of, AppError};

/// A layout with defects is still a successful preview: `is_valid` is
/// false and the problems are listed in `errors`.
pub async fn preview(
    Extension(service): Extension<Arc<dyn LocationService>>,
    payload: Result<Json<LayoutConfig>, JsonRejection>,
) -> Result<Json<PreviewResult>, AppError> {
    let Json(config) = payload?;
    Ok(Json(service.preview(&config)))
}

/// Body is always a `BulkCreateResult`. Status is 201 on success and
/// follows the failure kind otherwise.
pub async fn bulk_create(
    Extension(principal): Extension<Principal>,
    Extension(service): Extension<Arc<dyn LocationService>>,
    payload: Result<Json<LayoutConfig>, JsonRejection>,
) -> Result<(StatusCode, Json<BulkCreateResult>), AppError> {
    let Json(config) = payload?;
    match service.bulk_create(&principal, config).await {
        Ok(result) => Ok((StatusCode::CREATED, Json(result))),
        Err(e @ LocationError::Unauthorized(_)) => Err(e.into()),
        Err(e) => {
            if matches!(e, LocationError::Internal(_)) {
                tracing::error!("bulk create failed: {:#}", e);
            }
            Ok((status_of(&e), Json(BulkCreateResult::failed(e.to_bulk_error()))))
        }
    }
}

pub async fn get_location(
    Extension(service): Extension<Arc<dyn LocationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<StorageLocation>, AppError> {
    let location = service.get_location(id).await?;
    Ok(Json(location))
}
