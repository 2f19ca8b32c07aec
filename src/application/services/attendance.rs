//! Attendance and penalty management
//!
//! Validates check-in codes against the attendance window, converts missed
//! confirmed bookings into no-shows with penalties, completes attended
//! bookings after their end, and settles penalties.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::penalty::{Penalty, PenaltyStatus};
use crate::domain::policy::BookingPolicy;
use crate::domain::resource::UnitStatus;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct AttendanceService {
    repos: Arc<dyn RepositoryProvider>,
    policy: BookingPolicy,
    checkin_window_minutes: i64,
}

impl AttendanceService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        policy: BookingPolicy,
        checkin_window_minutes: i64,
    ) -> Self {
        Self {
            repos,
            policy,
            checkin_window_minutes,
        }
    }

    /// Check in with an attendance code. Succeeds only for a confirmed
    /// booking within the window around its start; never mutates state on
    /// failure, so resubmitting an already-used code reports WrongState
    /// instead of a second success.
    pub async fn check_in(&self, code: &str) -> DomainResult<Booking> {
        self.check_in_at(code, Utc::now()).await
    }

    pub async fn check_in_at(&self, code: &str, now: DateTime<Utc>) -> DomainResult<Booking> {
        let booking = self
            .repos
            .bookings()
            .find_by_code(code)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", "attendance_code", code))?;

        if booking.status != BookingStatus::Confirmed {
            return Err(DomainError::WrongState {
                entity: "Booking",
                current: booking.status.to_string(),
                attempted: "check in",
            });
        }

        if !booking.within_checkin_window(now, self.checkin_window_minutes) {
            return Err(DomainError::OutsideWindow {
                minutes_off: (now - booking.start_ts).num_minutes(),
            });
        }

        let moved = self
            .repos
            .bookings()
            .set_status_guarded(booking.id, BookingStatus::Confirmed, BookingStatus::Arrived)
            .await?;
        if !moved {
            // The no-show sweep got there first.
            let current = self
                .repos
                .bookings()
                .find_by_id(booking.id)
                .await?
                .map(|b| b.status.to_string())
                .unwrap_or_else(|| "unknown".into());
            return Err(DomainError::WrongState {
                entity: "Booking",
                current,
                attempted: "check in",
            });
        }

        // Transient occupancy marker; released by the completion sweep.
        self.repos
            .units()
            .set_status(booking.resource_unit_id, UnitStatus::InUse)
            .await?;

        info!(booking_id = %booking.id, "Check-in accepted");
        Ok(Booking {
            status: BookingStatus::Arrived,
            ..booking
        })
    }

    /// Convert every confirmed booking whose check-in window has closed
    /// into a no-show with one penalty. Returns how many bookings moved.
    pub async fn assess_no_shows(&self) -> DomainResult<usize> {
        self.assess_no_shows_at(Utc::now()).await
    }

    pub async fn assess_no_shows_at(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let cutoff = now - Duration::minutes(self.checkin_window_minutes);
        let missed = self.repos.bookings().find_missed_checkins(cutoff).await?;

        let mut moved = 0;
        for booking in missed {
            let won = self
                .repos
                .bookings()
                .set_status_guarded(booking.id, BookingStatus::Confirmed, BookingStatus::NoShow)
                .await?;
            if !won {
                // A concurrent check-in or cancellation beat the sweep.
                continue;
            }
            moved += 1;

            if let Err(e) = self.issue_penalty(&booking).await {
                warn!(booking_id = %booking.id, error = %e, "Failed to issue no-show penalty");
            }
        }

        if moved > 0 {
            info!(count = moved, "No-show sweep moved bookings");
        }
        Ok(moved)
    }

    /// One penalty per no-show booking; siblings of a group booking are
    /// each billed for their own unit.
    async fn issue_penalty(&self, booking: &Booking) -> DomainResult<()> {
        if self
            .repos
            .penalties()
            .exists_for_booking(booking.id)
            .await?
        {
            return Ok(());
        }

        let unit = self
            .repos
            .units()
            .find_by_id(booking.resource_unit_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found("ResourceUnit", "id", booking.resource_unit_id)
            })?;

        let amount = self.policy.penalty_amount(unit.kind, booking.duration());
        let reason = format!(
            "No-show for {} booking ({})",
            unit.kind,
            describe_duration(booking.duration())
        );
        self.repos
            .penalties()
            .save(Penalty::new(booking.booked_for, booking.id, amount, reason))
            .await
    }

    /// Complete every arrived booking past its end and release the unit.
    pub async fn complete_finished(&self) -> DomainResult<usize> {
        self.complete_finished_at(Utc::now()).await
    }

    pub async fn complete_finished_at(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let finished = self.repos.bookings().find_finished_arrivals(now).await?;

        let mut moved = 0;
        for booking in finished {
            let won = self
                .repos
                .bookings()
                .set_status_guarded(booking.id, BookingStatus::Arrived, BookingStatus::Completed)
                .await?;
            if !won {
                continue;
            }
            moved += 1;

            if let Err(e) = self
                .repos
                .units()
                .set_status(booking.resource_unit_id, UnitStatus::Available)
                .await
            {
                warn!(unit_id = %booking.resource_unit_id, error = %e, "Failed to release unit");
            }
        }
        Ok(moved)
    }

    pub async fn waive_penalty(&self, id: Uuid) -> DomainResult<()> {
        self.settle_penalty(id, PenaltyStatus::Waived).await
    }

    pub async fn mark_penalty_paid(&self, id: Uuid) -> DomainResult<()> {
        self.settle_penalty(id, PenaltyStatus::Paid).await
    }

    async fn settle_penalty(&self, id: Uuid, to: PenaltyStatus) -> DomainResult<()> {
        let penalty = self
            .repos
            .penalties()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Penalty", "id", id))?;

        let moved = self.repos.penalties().settle_guarded(id, to).await?;
        if !moved {
            return Err(DomainError::WrongState {
                entity: "Penalty",
                current: penalty.status.to_string(),
                attempted: "settle",
            });
        }
        info!(penalty_id = %id, status = %to, "Penalty settled");
        Ok(())
    }

    pub async fn list_penalties(&self, user_id: Uuid) -> DomainResult<Vec<Penalty>> {
        self.repos.penalties().list_for_user(user_id).await
    }
}

fn describe_duration(d: Duration) -> String {
    let minutes = d.num_minutes();
    match minutes {
        60 => "1 hour".to_string(),
        m if m % 60 == 0 => format!("{} hours", m / 60),
        m => format!("{m} minutes"),
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    use crate::domain::resource::{Location, ResourceDetails, ResourceKind, ResourceUnit};
    use crate::infrastructure::memory::InMemoryRepositoryProvider;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 20, h, m, 0).unwrap()
    }

    fn seat() -> ResourceUnit {
        ResourceUnit::new(
            ResourceKind::LibrarySeat,
            Some(Uuid::new_v4()),
            Location {
                building: "Central Library".into(),
                room_code: "LIB-2F".into(),
                floor: 2,
            },
            ResourceDetails::Seat {
                table_label: "T1".into(),
                seat_number: 1,
            },
        )
    }

    async fn service() -> (Arc<dyn RepositoryProvider>, AttendanceService) {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let svc = AttendanceService::new(repos.clone(), BookingPolicy::default(), 15);
        (repos, svc)
    }

    /// Insert a confirmed booking for a fresh seat, returning it.
    async fn confirmed_booking(
        repos: &Arc<dyn RepositoryProvider>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Booking {
        let unit = seat();
        repos.units().save(unit.clone()).await.unwrap();
        let booking = Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            unit.id,
            start,
            end,
            vec![],
            None,
        );
        repos
            .bookings()
            .claim_group(vec![booking])
            .await
            .unwrap()
            .remove(0)
    }

    #[tokio::test]
    async fn check_in_is_idempotent_safe() {
        let (repos, svc) = service().await;
        let booking = confirmed_booking(&repos, ts(9, 0), ts(11, 0)).await;

        let arrived = svc
            .check_in_at(&booking.attendance_code, ts(9, 5))
            .await
            .unwrap();
        assert_eq!(arrived.status, BookingStatus::Arrived);

        // Second submission of the same code: WrongState, not a second success
        let err = svc
            .check_in_at(&booking.attendance_code, ts(9, 6))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::WrongState { .. }));
    }

    #[tokio::test]
    async fn check_in_marks_unit_in_use() {
        let (repos, svc) = service().await;
        let booking = confirmed_booking(&repos, ts(9, 0), ts(11, 0)).await;

        svc.check_in_at(&booking.attendance_code, ts(8, 50))
            .await
            .unwrap();

        let unit = repos
            .units()
            .find_by_id(booking.resource_unit_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unit.status, UnitStatus::InUse);
    }

    #[tokio::test]
    async fn check_in_outside_window_is_rejected() {
        let (repos, svc) = service().await;
        let booking = confirmed_booking(&repos, ts(9, 0), ts(11, 0)).await;

        // Too early and too late both fail without mutating state
        for attempt in [ts(8, 44), ts(9, 16)] {
            let err = svc
                .check_in_at(&booking.attendance_code, attempt)
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::OutsideWindow { .. }));
        }

        // Still checkable inside the window afterwards
        svc.check_in_at(&booking.attendance_code, ts(9, 15))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let (_repos, svc) = service().await;
        let err = svc.check_in_at("NOSUCHCODE", ts(9, 0)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn sweep_creates_one_penalty_per_sibling() {
        let (repos, svc) = service().await;

        // Three-seat, two-hour group booking with no check-in
        let group_id = Uuid::new_v4();
        let user = Uuid::new_v4();
        let mut bookings = Vec::new();
        for _ in 0..3 {
            let unit = seat();
            repos.units().save(unit.clone()).await.unwrap();
            bookings.push(Booking::new(
                group_id,
                user,
                user,
                unit.id,
                ts(9, 0),
                ts(11, 0),
                vec![],
                None,
            ));
        }
        repos.bookings().claim_group(bookings).await.unwrap();

        // Window (15 min) has elapsed
        let moved = svc.assess_no_shows_at(ts(9, 16)).await.unwrap();
        assert_eq!(moved, 3);

        let penalties = svc.list_penalties(user).await.unwrap();
        assert_eq!(penalties.len(), 3);
        for p in &penalties {
            // library rate 100/h x 2h, billed per seat - not pooled
            assert_eq!(p.amount, Decimal::from(200));
            assert_eq!(p.status, PenaltyStatus::Pending);
            assert!(p.reason.contains("library_seat"));
            assert!(p.reason.contains("2 hours"));
        }

        // Re-running the sweep moves nothing and adds no penalties
        let moved = svc.assess_no_shows_at(ts(9, 20)).await.unwrap();
        assert_eq!(moved, 0);
        assert_eq!(svc.list_penalties(user).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn check_in_after_sweep_loses() {
        let (repos, svc) = service().await;
        let booking = confirmed_booking(&repos, ts(9, 0), ts(10, 0)).await;

        svc.assess_no_shows_at(ts(9, 30)).await.unwrap();

        let err = svc
            .check_in_at(&booking.attendance_code, ts(9, 30))
            .await
            .unwrap_err();
        // Outside the window anyway, but even a well-timed code would fail:
        // the booking is no longer confirmed.
        assert!(matches!(
            err,
            DomainError::WrongState { .. } | DomainError::OutsideWindow { .. }
        ));

        let current = repos
            .bookings()
            .find_by_id(booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.status, BookingStatus::NoShow);
    }

    #[tokio::test]
    async fn sweep_ignores_bookings_still_inside_window() {
        let (repos, svc) = service().await;
        confirmed_booking(&repos, ts(9, 0), ts(10, 0)).await;

        let moved = svc.assess_no_shows_at(ts(9, 10)).await.unwrap();
        assert_eq!(moved, 0);
    }

    #[tokio::test]
    async fn completion_sweep_releases_units() {
        let (repos, svc) = service().await;
        let booking = confirmed_booking(&repos, ts(9, 0), ts(10, 0)).await;

        svc.check_in_at(&booking.attendance_code, ts(9, 0))
            .await
            .unwrap();

        // Not finished yet
        assert_eq!(svc.complete_finished_at(ts(9, 59)).await.unwrap(), 0);

        // Past end: completed and the unit is available again
        assert_eq!(svc.complete_finished_at(ts(10, 1)).await.unwrap(), 1);
        let current = repos
            .bookings()
            .find_by_id(booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.status, BookingStatus::Completed);

        let unit = repos
            .units()
            .find_by_id(booking.resource_unit_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unit.status, UnitStatus::Available);
    }

    #[tokio::test]
    async fn penalty_settlement_transitions() {
        let (repos, svc) = service().await;
        let booking = confirmed_booking(&repos, ts(9, 0), ts(10, 0)).await;
        svc.assess_no_shows_at(ts(9, 30)).await.unwrap();

        let penalty = svc
            .list_penalties(booking.booked_for)
            .await
            .unwrap()
            .remove(0);

        svc.waive_penalty(penalty.id).await.unwrap();

        // Settling twice is rejected
        let err = svc.mark_penalty_paid(penalty.id).await.unwrap_err();
        assert!(matches!(err, DomainError::WrongState { .. }));

        // Unknown penalty is NotFound
        let err = svc.waive_penalty(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn duration_descriptions() {
        assert_eq!(describe_duration(Duration::minutes(60)), "1 hour");
        assert_eq!(describe_duration(Duration::minutes(120)), "2 hours");
        assert_eq!(describe_duration(Duration::minutes(45)), "45 minutes");
    }
}
