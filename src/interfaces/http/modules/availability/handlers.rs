//! Availability HTTP handlers

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::resource::ResourceKind;
use crate::interfaces::http::common::{domain_error_response, ApiResponse};
use crate::interfaces::http::router::ApiState;

use super::dto::{AvailabilityDto, AvailabilityQuery};

type ErrorReply = (StatusCode, Json<ApiResponse<AvailabilityDto>>);

fn bad_request(message: impl Into<String>) -> ErrorReply {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::error_with_code(message, "validation")),
    )
}

#[utoipa::path(
    get,
    path = "/api/v1/availability",
    tag = "Availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Available unit ids (advisory)", body = ApiResponse<AvailabilityDto>),
        (status = 422, description = "Malformed query")
    )
)]
pub async fn get_availability(
    State(state): State<ApiState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityDto>>, ErrorReply> {
    let kind = ResourceKind::from_str(&query.kind)
        .ok_or_else(|| bad_request(format!("Unknown resource kind: {}", query.kind)))?;

    let unit_ids: Vec<Uuid> = query
        .unit_ids
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s.trim()).map_err(|e| bad_request(format!("Invalid unit id: {}", e)))
        })
        .collect::<Result<_, _>>()?;

    let start = DateTime::parse_from_rfc3339(&query.start)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| bad_request(format!("Invalid start: {}", e)))?;
    let end = DateTime::parse_from_rfc3339(&query.end)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| bad_request(format!("Invalid end: {}", e)))?;

    let available = state
        .availability
        .find_available(kind, &unit_ids, start, end)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(AvailabilityDto {
        available_unit_ids: available,
    })))
}
