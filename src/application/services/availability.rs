//! Availability engine
//!
//! Computes which candidate units are free over a requested window by
//! consulting holding-status bookings for overlap. Advisory for display:
//! the authoritative re-check happens inside the scheduler's claim
//! transaction, so staleness between this read and a later claim is
//! expected and handled by the Conflict error path.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::resource::ResourceKind;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct AvailabilityService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AvailabilityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Subset of `candidate_unit_ids` that are active units of `kind` with
    /// no overlapping holding-status booking in [start, end). Candidate
    /// order is preserved.
    pub async fn find_available(
        &self,
        kind: ResourceKind,
        candidate_unit_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Uuid>> {
        if end <= start {
            return Err(DomainError::validation("end_ts", "end must be after start"));
        }
        if candidate_unit_ids.is_empty() {
            return Ok(vec![]);
        }

        let units = self.repos.units().find_by_ids(candidate_unit_ids).await?;
        let eligible: HashSet<Uuid> = units
            .iter()
            .filter(|u| u.kind == kind && u.accepts_bookings())
            .map(|u| u.id)
            .collect();

        if eligible.is_empty() {
            return Ok(vec![]);
        }

        let eligible_ids: Vec<Uuid> = candidate_unit_ids
            .iter()
            .filter(|id| eligible.contains(id))
            .copied()
            .collect();

        let conflicting: HashSet<Uuid> = self
            .repos
            .bookings()
            .find_conflicting_units(&eligible_ids, start, end)
            .await?
            .into_iter()
            .collect();

        Ok(eligible_ids
            .into_iter()
            .filter(|id| !conflicting.contains(id))
            .collect())
    }
}

// ── Tests ──────────────────────────────────────────────────────
