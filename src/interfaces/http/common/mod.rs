//! Common API response envelope and error mapping

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::DomainError;

/// Standard API response wrapper.
///
/// Every REST endpoint returns data in this envelope. On success:
/// `{"success": true, "data": {...}}`; on failure: `{"success": false,
/// "error": "...", "error_code": "..."}` plus the losing unit ids for
/// booking conflicts.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload; `null` on failure
    pub data: Option<T>,
    /// Human-readable error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable reason code (validation, conflict, not_found,
    /// wrong_status, outside_window, policy_missing, transient)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Units that lost the availability race, on conflict errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_unit_ids: Option<Vec<Uuid>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
            conflicting_unit_ids: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_code: None,
            conflicting_unit_ids: None,
        }
    }

    pub fn error_with_code(message: impl Into<String>, code: &'static str) -> Self {
        Self {
            error_code: Some(code.to_string()),
            ..Self::error(message)
        }
    }
}

/// Empty response for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// Map a domain error onto an HTTP status plus the response envelope.
pub fn domain_error_response<T>(err: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    let message = err.to_string();
    let (status, body) = match err {
        DomainError::Validation { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiResponse::error_with_code(message, "validation"),
        ),
        DomainError::Conflict { unit_ids } => (
            StatusCode::CONFLICT,
            ApiResponse {
                conflicting_unit_ids: Some(unit_ids),
                ..ApiResponse::error_with_code(message, "conflict")
            },
        ),
        DomainError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            ApiResponse::error_with_code(message, "not_found"),
        ),
        DomainError::WrongState { .. } => (
            StatusCode::CONFLICT,
            ApiResponse::error_with_code(message, "wrong_status"),
        ),
        DomainError::OutsideWindow { .. } => (
            StatusCode::CONFLICT,
            ApiResponse::error_with_code(message, "outside_window"),
        ),
        DomainError::PolicyMissing { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiResponse::error_with_code(message, "policy_missing"),
        ),
        DomainError::Transient(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            ApiResponse::error_with_code(message, "transient"),
        ),
    };
    (status, Json(body))
}

// ── Tests ──────────────────────────────────────────────────────
