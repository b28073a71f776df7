//! Response DTOs shared by the service and the HTTP surface.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of leading names returned by a preview.
pub const PREVIEW_SAMPLE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResult {
    pub sample_names: Vec<String>,
    pub last_name: Option<String>,
    pub total_count: u64,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub is_valid: bool,
}

/// Which gate stopped a bulk creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkFailureKind {
    Validation,
    ParentNotFound,
    DuplicateNames,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCreateError {
    pub kind: BulkFailureKind,
    pub message: String,
    /// Layout problems, for `validation` failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Names that already exist, for `duplicate_names` failures. May be
    /// empty when the collision was only detected by the store's unique
    /// constraint at commit time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicting_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCreateResult {
    pub created_ids: Vec<Uuid>,
    pub created_count: usize,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<BulkCreateError>,
}

impl BulkCreateResult {
    pub fn created(created_ids: Vec<Uuid>) -> Self {
        Self {
            created_count: created_ids.len(),
            created_ids,
            success: true,
            error: None,
        }
    }

    pub fn failed(error: BulkCreateError) -> Self {
        Self {
            created_ids: Vec::new(),
            created_count: 0,
            success: false,
            error: Some(error),
        }
    }
}
