//! Row types decoded straight from `storage_locations`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use stowage_core::layout::LayoutSnapshot;
use stowage_core::location::{LocationType, StorageLocation};

#[derive(Debug, sqlx::FromRow)]
pub struct PgLocationRow {
    pub id: Uuid,
    pub name: String,
    pub location_type: String,
    pub parent_id: Option<Uuid>,
    pub location_hierarchy: String,
    pub single_part_only: bool,
    pub layout_config: Option<serde_json::Value>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PgLocationRow> for StorageLocation {
    type Error = String;

    fn try_from(row: PgLocationRow) -> Result<Self, Self::Error> {
        let location_type = LocationType::from_str(&row.location_type)
            .ok_or_else(|| format!("unknown location_type '{}'", row.location_type))?;
        let layout_config = row
            .layout_config
            .map(serde_json::from_value::<LayoutSnapshot>)
            .transpose()
            .map_err(|e| format!("bad layout_config on {}: {e}", row.id))?;
        Ok(StorageLocation {
            id: row.id,
            name: row.name,
            location_type,
            parent_id: row.parent_id,
            location_hierarchy: row.location_hierarchy,
            single_part_only: row.single_part_only,
            layout_config,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(location_type: &str, layout_config: Option<serde_json::Value>) -> PgLocationRow {
        let now = Utc::now();
        PgLocationRow {
            id: Uuid::new_v4(),
            name: "box1-a".into(),
            location_type: location_type.into(),
            parent_id: None,
            location_hierarchy: "box1-a".into(),
            single_part_only: false,
            layout_config,
            created_by: Some("alice".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn converts_known_type() {
        let loc = StorageLocation::try_from(row("drawer", None)).unwrap();
        assert_eq!(loc.location_type, LocationType::Drawer);
        assert!(loc.layout_config.is_none());
    }

    #[test]
    fn rejects_unknown_type() {
        let err = StorageLocation::try_from(row("closet", None)).unwrap_err();
        assert!(err.contains("closet"));
    }

    #[test]
    fn rejects_malformed_snapshot() {
        let err =
            StorageLocation::try_from(row("bin", Some(serde_json::json!({"nope": 1})))).unwrap_err();
        assert!(err.contains("layout_config"));
    }
}
