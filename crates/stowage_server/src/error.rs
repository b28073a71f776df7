//! Maps domain errors and body rejections onto HTTP responses.
//!
//! Every error body has the shape `{"error": "...", "kind": "..."}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use stowage_core::error::LocationError;

#[derive(Debug)]
pub enum AppError {
    Service(LocationError),
    /// Body could not be read as JSON. Keeps axum's status: 400 for
    /// malformed syntax, 422 for a shape mismatch, 415 for a missing
    /// content type.
    Rejection(JsonRejection),
}

impl From<LocationError> for AppError {
    fn from(e: LocationError) -> Self {
        Self::Service(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(r: JsonRejection) -> Self {
        Self::Rejection(r)
    }
}

/// Status code for a domain error.
pub fn status_of(e: &LocationError) -> StatusCode {
    StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, kind) = match self {
            Self::Service(e) => {
                if matches!(e, LocationError::Internal(_)) {
                    tracing::error!("internal error: {:#}", e);
                }
                (status_of(&e), e.to_string(), e.kind())
            }
            Self::Rejection(r) => {
                tracing::debug!(status = %r.status(), "rejected request body");
                (r.status(), r.body_text(), "schema")
            }
        };
        let body = serde_json::json!({ "error": message, "kind": kind });
        (status, Json(body)).into_response()
    }
}
