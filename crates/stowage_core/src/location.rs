//! Persisted storage location records.
//! These are pure value types: no sqlx, no DB dependencies.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::LayoutSnapshot;

/// Hierarchy path separator between ancestor names.
pub const HIERARCHY_SEPARATOR: &str = "/";

/// Kind of physical place a location represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Room,
    Building,
    Cabinet,
    Shelf,
    Drawer,
    Bin,
    Box,
    Container,
    Other,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Building => "building",
            Self::Cabinet => "cabinet",
            Self::Shelf => "shelf",
            Self::Drawer => "drawer",
            Self::Bin => "bin",
            Self::Box => "box",
            Self::Container => "container",
            Self::Other => "other",
        }
    }

    // Returns None for unknown values rather than an error.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "room" => Some(Self::Room),
            "building" => Some(Self::Building),
            "cabinet" => Some(Self::Cabinet),
            "shelf" => Some(Self::Shelf),
            "drawer" => Some(Self::Drawer),
            "bin" => Some(Self::Bin),
            "box" => Some(Self::Box),
            "container" => Some(Self::Container),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted storage location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageLocation {
    pub id: Uuid,
    /// Globally unique across all locations, regardless of parent.
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub parent_id: Option<Uuid>,
    /// Materialized ancestor-to-node path, e.g. `warehouse/shelf-a/bin-3`.
    pub location_hierarchy: String,
    pub single_part_only: bool,
    /// Resolved layout this row was generated from. Absent for rows that
    /// were not created through bulk creation.
    pub layout_config: Option<LayoutSnapshot>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row about to be inserted as part of one bulk-creation batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLocation {
    pub id: Uuid,
    pub name: String,
    pub location_type: LocationType,
    pub parent_id: Option<Uuid>,
    pub location_hierarchy: String,
    pub single_part_only: bool,
    pub layout_config: LayoutSnapshot,
    pub created_by: String,
}

/// Hierarchy path for a location named `name` under `parent_path`.
pub fn hierarchy_path(parent_path: Option<&str>, name: &str) -> String {
    match parent_path {
        Some(parent) if !parent.is_empty() => format!("{parent}{HIERARCHY_SEPARATOR}{name}"),
        _ => name.to_string(),
    }
}
