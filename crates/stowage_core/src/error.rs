use thiserror::Error;
use uuid::Uuid;

use crate::proto::{BulkCreateError, BulkFailureKind};
use crate::validate::ValidationReport;

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("layout rejected: {}", .0.error_messages().join("; "))]
    Validation(ValidationReport),

    #[error("parent location not found: {0}")]
    ParentNotFound(Uuid),

    #[error("location not found: {0}")]
    NotFound(Uuid),

    #[error("{} location name(s) already exist: {}", .0.len(), .0.join(", "))]
    DuplicateNames(Vec<String>),

    #[error("location name already exists: {0}")]
    ConstraintViolation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl LocationError {
    /// Layout problems are business-rule outcomes, not transport failures,
    /// and are reported with `200` like a failed preview.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 200,
            Self::ParentNotFound(_) => 404,
            Self::NotFound(_) => 404,
            Self::DuplicateNames(_) => 409,
            Self::ConstraintViolation(_) => 409,
            Self::Unauthorized(_) => 401,
            Self::Internal(_) => 500,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::ParentNotFound(_) => "parent_not_found",
            Self::NotFound(_) => "not_found",
            Self::DuplicateNames(_) | Self::ConstraintViolation(_) => "duplicate_names",
            Self::Unauthorized(_) => "unauthorized",
            Self::Internal(_) => "internal",
        }
    }

    /// Failure detail for a bulk-create response body.
    pub fn to_bulk_error(&self) -> BulkCreateError {
        let (kind, errors, conflicting_names) = match self {
            Self::Validation(report) => (
                BulkFailureKind::Validation,
                report.error_messages(),
                Vec::new(),
            ),
            Self::ParentNotFound(_) => (BulkFailureKind::ParentNotFound, Vec::new(), Vec::new()),
            Self::DuplicateNames(names) => {
                (BulkFailureKind::DuplicateNames, Vec::new(), names.clone())
            }
            Self::ConstraintViolation(_) => {
                (BulkFailureKind::DuplicateNames, Vec::new(), Vec::new())
            }
            _ => (BulkFailureKind::Internal, Vec::new(), Vec::new()),
        };
        BulkCreateError {
            kind,
            message: self.to_string(),
            errors,
            conflicting_names,
        }
    }
}
