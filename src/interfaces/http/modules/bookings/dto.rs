//! Booking DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::booking::Booking;

/// Request to create a booking (one or more units as a group)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    /// Requesting user (identity comes from the external auth layer)
    pub requester_id: Uuid,
    /// Caller role: student, faculty, staff, admin
    pub requester_role: String,
    /// Resource kind: library_seat, equipment_unit, room
    pub kind: String,
    /// Units to claim together; all or nothing
    #[validate(length(min = 1, max = 16))]
    pub candidate_unit_ids: Vec<Uuid>,
    /// Booking start (ISO 8601 with offset)
    pub start_ts: String,
    /// Booking end (ISO 8601 with offset)
    pub end_ts: String,
    /// External identifiers of companions
    #[serde(default)]
    #[validate(length(max = 5))]
    pub companion_ids: Vec<String>,
    pub notes: Option<String>,
}

/// Request to cancel a booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelBookingRequest {
    pub actor_id: Uuid,
    /// Caller role: student, faculty, staff, admin
    pub actor_role: String,
}

/// Query for listing a user's bookings
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListBookingsQuery {
    pub user_id: Uuid,
}

/// Booking details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: Uuid,
    pub group_id: Uuid,
    pub booked_by: Uuid,
    pub booked_for: Uuid,
    pub resource_unit_id: Uuid,
    pub start_ts: String,
    pub end_ts: String,
    pub status: String,
    pub attendance_code: String,
    pub companions: Vec<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            group_id: b.group_id,
            booked_by: b.booked_by,
            booked_for: b.booked_for,
            resource_unit_id: b.resource_unit_id,
            start_ts: b.start_ts.to_rfc3339(),
            end_ts: b.end_ts.to_rfc3339(),
            status: b.status.as_str().to_string(),
            attendance_code: b.attendance_code,
            companions: b.companions,
            notes: b.notes,
            created_at: b.created_at.to_rfc3339(),
        }
    }
}
