//! Availability DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Availability query
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AvailabilityQuery {
    /// Resource kind: library_seat, equipment_unit, room
    pub kind: String,
    /// Comma-separated candidate unit ids
    pub unit_ids: String,
    /// Window start (ISO 8601 with offset)
    pub start: String,
    /// Window end (ISO 8601 with offset)
    pub end: String,
}

/// Units free over the requested window (advisory; the claim re-checks)
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityDto {
    pub available_unit_ids: Vec<Uuid>,
}
