//! Booking HTTP handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::booking::BookingRequest;
use crate::domain::policy::Role;
use crate::domain::resource::ResourceKind;
use crate::interfaces::http::common::{
    domain_error_response, ApiResponse, EmptyData, ValidatedJson,
};
use crate::interfaces::http::router::ApiState;

use super::dto::*;

type ErrorReply<T> = (StatusCode, Json<ApiResponse<T>>);

fn bad_request<T>(message: impl Into<String>) -> ErrorReply<T> {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::error_with_code(message, "validation")),
    )
}

fn parse_ts<T>(field: &str, value: &str) -> Result<DateTime<Utc>, ErrorReply<T>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| bad_request(format!("Invalid {}: {}", field, e)))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Bookings created, one per unit", body = ApiResponse<Vec<BookingDto>>),
        (status = 409, description = "Units no longer available"),
        (status = 422, description = "Policy violation (horizon/duration/hours/capacity)")
    )
)]
pub async fn create_booking(
    State(state): State<ApiState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<BookingDto>>>), ErrorReply<Vec<BookingDto>>> {
    let role = Role::from_str(&request.requester_role)
        .ok_or_else(|| bad_request(format!("Unknown role: {}", request.requester_role)))?;
    let kind = ResourceKind::from_str(&request.kind)
        .ok_or_else(|| bad_request(format!("Unknown resource kind: {}", request.kind)))?;
    let start_ts = parse_ts("start_ts", &request.start_ts)?;
    let end_ts = parse_ts("end_ts", &request.end_ts)?;

    let booking_request = BookingRequest {
        requester_id: request.requester_id,
        requester_role: role,
        kind,
        candidate_unit_ids: request.candidate_unit_ids,
        start_ts,
        end_ts,
        companion_ids: request.companion_ids,
        notes: request.notes,
    };

    let created = state
        .scheduler
        .create_booking(booking_request)
        .await
        .map_err(domain_error_response)?;

    let dtos: Vec<BookingDto> = created.into_iter().map(BookingDto::from).collect();
    Ok((StatusCode::CREATED, Json(ApiResponse::success(dtos))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{booking_id}/cancel",
    tag = "Bookings",
    params(("booking_id" = Uuid, Path, description = "Booking ID")),
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<EmptyData>),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking already terminal")
    )
)]
pub async fn cancel_booking(
    State(state): State<ApiState>,
    Path(booking_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<CancelBookingRequest>,
) -> Result<Json<ApiResponse<EmptyData>>, ErrorReply<EmptyData>> {
    let role = Role::from_str(&request.actor_role)
        .ok_or_else(|| bad_request(format!("Unknown role: {}", request.actor_role)))?;

    state
        .scheduler
        .cancel_booking(booking_id, request.actor_id, role)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    params(ListBookingsQuery),
    responses(
        (status = 200, description = "User's bookings, newest start first", body = ApiResponse<Vec<BookingDto>>)
    )
)]
pub async fn list_bookings(
    State(state): State<ApiState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<ApiResponse<Vec<BookingDto>>>, ErrorReply<Vec<BookingDto>>> {
    let bookings = state
        .scheduler
        .list_user_bookings(query.user_id)
        .await
        .map_err(domain_error_response)?;

    let dtos: Vec<BookingDto> = bookings.into_iter().map(BookingDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}
