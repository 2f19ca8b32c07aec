//! Penalty HTTP handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::interfaces::http::common::{
    domain_error_response, ApiResponse, EmptyData, ValidatedJson,
};
use crate::interfaces::http::router::ApiState;

use super::dto::*;

type ErrorReply<T> = (StatusCode, Json<ApiResponse<T>>);

#[utoipa::path(
    get,
    path = "/api/v1/penalties",
    tag = "Penalties",
    params(ListPenaltiesQuery),
    responses(
        (status = 200, description = "User's penalties, newest first", body = ApiResponse<Vec<PenaltyDto>>)
    )
)]
pub async fn list_penalties(
    State(state): State<ApiState>,
    Query(query): Query<ListPenaltiesQuery>,
) -> Result<Json<ApiResponse<Vec<PenaltyDto>>>, ErrorReply<Vec<PenaltyDto>>> {
    let penalties = state
        .attendance
        .list_penalties(query.user_id)
        .await
        .map_err(domain_error_response)?;

    let dtos: Vec<PenaltyDto> = penalties.into_iter().map(PenaltyDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/penalties/{penalty_id}",
    tag = "Penalties",
    params(("penalty_id" = Uuid, Path, description = "Penalty ID")),
    request_body = SettlePenaltyRequest,
    responses(
        (status = 200, description = "Penalty settled", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Penalty is not pending")
    )
)]
pub async fn settle_penalty(
    State(state): State<ApiState>,
    Path(penalty_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<SettlePenaltyRequest>,
) -> Result<Json<ApiResponse<EmptyData>>, ErrorReply<EmptyData>> {
    let result = match request.status.as_str() {
        "waived" => state.attendance.waive_penalty(penalty_id).await,
        "paid" => state.attendance.mark_penalty_paid(penalty_id).await,
        other => {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::error_with_code(
                    format!("Unknown settlement status: {}", other),
                    "validation",
                )),
            ))
        }
    };

    result.map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
