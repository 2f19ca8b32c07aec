//! Penalty DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::penalty::Penalty;

/// Query for listing a user's penalties
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListPenaltiesQuery {
    pub user_id: Uuid,
}

/// Settlement request: waive or mark paid
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SettlePenaltyRequest {
    /// Target status: waived or paid
    #[validate(length(min = 1))]
    pub status: String,
}

/// Penalty details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct PenaltyDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub booking_id: Uuid,
    pub amount: String,
    pub reason: String,
    pub status: String,
    pub created_at: String,
}

impl From<Penalty> for PenaltyDto {
    fn from(p: Penalty) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            booking_id: p.booking_id,
            amount: p.amount.to_string(),
            reason: p.reason,
            status: p.status.as_str().to_string(),
            created_at: p.created_at.to_rfc3339(),
        }
    }
}
