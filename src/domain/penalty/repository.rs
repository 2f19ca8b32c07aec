//! Penalty repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Penalty, PenaltyStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait PenaltyRepository: Send + Sync {
    /// Save a new penalty
    async fn save(&self, penalty: Penalty) -> DomainResult<()>;

    /// Find penalty by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Penalty>>;

    /// Whether a penalty already exists for a booking (1:1 per no-show)
    async fn exists_for_booking(&self, booking_id: Uuid) -> DomainResult<bool>;

    /// All penalties for a user, newest first
    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Penalty>>;

    /// Compare-and-set settlement: Pending -> Waived | Paid.
    /// Returns Ok(true) when the row was moved, Ok(false) when the penalty
    /// was no longer pending.
    async fn settle_guarded(&self, id: Uuid, to: PenaltyStatus) -> DomainResult<bool>;
}
