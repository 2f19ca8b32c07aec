//! Check-in DTOs

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Attendance check-in by code
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckInRequest {
    /// Attendance code printed on the booking confirmation
    #[validate(length(min = 10, max = 16))]
    pub code: String,
}
