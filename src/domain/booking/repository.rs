//! Booking repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::{Booking, BookingStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Atomically claim every unit in the group for its time window.
    ///
    /// Re-verifies inside one transaction that none of the target units has
    /// an overlapping holding-status booking, then inserts all sibling rows.
    /// If any unit lost the race the whole group fails with
    /// `DomainError::Conflict` listing the losing unit ids; no partial group
    /// is ever committed. Storage timeout/deadlock surfaces as `Transient`.
    async fn claim_group(&self, bookings: Vec<Booking>) -> DomainResult<Vec<Booking>>;

    /// Find booking by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>>;

    /// Find booking by attendance code
    async fn find_by_code(&self, code: &str) -> DomainResult<Option<Booking>>;

    /// Subset of `unit_ids` holding an overlapping booking in [start, end).
    /// Advisory: the authoritative re-check happens inside `claim_group`.
    async fn find_conflicting_units(
        &self,
        unit_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Uuid>>;

    /// All bookings where the user is booker or member, start_ts descending
    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Booking>>;

    /// Compare-and-set status transition. Returns Ok(true) when the row was
    /// moved, Ok(false) when its status was no longer `from` (lost a race
    /// with a concurrent transition).
    async fn set_status_guarded(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> DomainResult<bool>;

    /// Confirmed bookings whose start_ts is before `cutoff` (i.e. the
    /// check-in window has already closed)
    async fn find_missed_checkins(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<Booking>>;

    /// Arrived bookings whose end_ts has passed
    async fn find_finished_arrivals(&self, now: DateTime<Utc>) -> DomainResult<Vec<Booking>>;
}
