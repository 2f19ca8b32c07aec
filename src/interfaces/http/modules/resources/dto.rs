//! Resource catalog DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::resource::ResourceUnit;

/// Query for listing units of a kind
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListUnitsQuery {
    /// Resource kind: library_seat, equipment_unit, room
    pub kind: String,
    /// Filter by unit status
    pub status: Option<String>,
    /// Filter by parent (table / equipment type)
    pub parent_id: Option<Uuid>,
    /// Include soft-retired units
    #[serde(default)]
    pub include_retired: bool,
}

/// Administrative status change
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUnitStatusRequest {
    /// New status: available, in_use, maintenance, inactive
    #[validate(length(min = 1))]
    pub status: String,
}

/// Resource unit in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ResourceUnitDto {
    pub id: Uuid,
    pub kind: String,
    pub parent_id: Option<Uuid>,
    pub status: String,
    pub building: String,
    pub room_code: String,
    pub floor: i32,
    /// Per-kind metadata, tagged by `kind`
    #[schema(value_type = Object)]
    pub details: serde_json::Value,
    pub created_at: String,
    pub retired_at: Option<String>,
}

impl From<ResourceUnit> for ResourceUnitDto {
    fn from(u: ResourceUnit) -> Self {
        Self {
            id: u.id,
            kind: u.kind.as_str().to_string(),
            parent_id: u.parent_id,
            status: u.status.as_str().to_string(),
            building: u.location.building,
            room_code: u.location.room_code,
            floor: u.location.floor,
            details: serde_json::to_value(&u.details).unwrap_or(serde_json::Value::Null),
            created_at: u.created_at.to_rfc3339(),
            retired_at: u.retired_at.map(|t| t.to_rfc3339()),
        }
    }
}
