//! Resource catalog HTTP handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::domain::resource::{ResourceKind, UnitFilter, UnitStatus};
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

#[utoipa::path(
    get,
    path = "/api/v1/resources",
    tag = "Resources",
    params(ListUnitsQuery),
    responses(
        (status = 200, description = "Units of the kind", body = ApiResponse<Vec<ResourceUnitDto>>),
        (status = 422, description = "Unknown kind or status")
    )
)]
pub async fn list_units(
    State(state): State<ApiState>,
    Query(query): Query<ListUnitsQuery>,
) -> Result<Json<ApiResponse<Vec<ResourceUnitDto>>>, ErrorReply<Vec<ResourceUnitDto>>> {
    let kind = ResourceKind::from_str(&query.kind)
        .ok_or_else(|| bad_request(format!("Unknown resource kind: {}", query.kind)))?;

    let status = match &query.status {
        Some(s) => Some(parse_status(s)?),
        None => None,
    };

    let filter = UnitFilter {
        status,
        parent_id: query.parent_id,
        include_retired: query.include_retired,
    };

    let units = state
        .catalog
        .list_units(kind, filter)
        .await
        .map_err(domain_error_response)?;

    let dtos: Vec<ResourceUnitDto> = units.into_iter().map(ResourceUnitDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/resources/{unit_id}",
    tag = "Resources",
    params(("unit_id" = Uuid, Path, description = "Resource unit ID")),
    responses(
        (status = 200, description = "Unit details", body = ApiResponse<ResourceUnitDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_unit(
    State(state): State<ApiState>,
    Path(unit_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ResourceUnitDto>>, ErrorReply<ResourceUnitDto>> {
    let unit = state
        .catalog
        .get_unit(unit_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(ResourceUnitDto::from(unit))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/resources/{unit_id}/status",
    tag = "Resources",
    params(("unit_id" = Uuid, Path, description = "Resource unit ID")),
    request_body = UpdateUnitStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Unknown status")
    )
)]
pub async fn set_unit_status(
    State(state): State<ApiState>,
    Path(unit_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateUnitStatusRequest>,
) -> Result<Json<ApiResponse<EmptyData>>, ErrorReply<EmptyData>> {
    let status = parse_status(&request.status)?;

    state
        .catalog
        .set_unit_status(unit_id, status)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    delete,
    path = "/api/v1/resources/{unit_id}",
    tag = "Resources",
    params(("unit_id" = Uuid, Path, description = "Resource unit ID")),
    responses(
        (status = 200, description = "Unit soft-retired", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found")
    )
)]
pub async fn retire_unit(
    State(state): State<ApiState>,
    Path(unit_id): Path<Uuid>,
) -> Result<Json<ApiResponse<EmptyData>>, ErrorReply<EmptyData>> {
    state
        .catalog
        .retire_unit(unit_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(EmptyData {})))
}

fn parse_status<T>(s: &str) -> Result<UnitStatus, ErrorReply<T>> {
    match s {
        "available" | "in_use" | "maintenance" | "inactive" => Ok(UnitStatus::from_str(s)),
        other => Err(bad_request(format!("Unknown unit status: {}", other))),
    }
}
