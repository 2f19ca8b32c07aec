//! Check-in HTTP handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::bookings::dto::BookingDto;
use crate::interfaces::http::router::ApiState;

use super::dto::CheckInRequest;

#[utoipa::path(
    post,
    path = "/api/v1/check-in",
    tag = "Attendance",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in; booking is now arrived", body = ApiResponse<BookingDto>),
        (status = 404, description = "Unknown attendance code (reason code: not_found)"),
        (status = 409, description = "Wrong status or outside window (reason code: wrong_status | outside_window)")
    )
)]
pub async fn check_in(
    State(state): State<ApiState>,
    ValidatedJson(request): ValidatedJson<CheckInRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .attendance
        .check_in(&request.code)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(BookingDto::from(booking))))
}
