//! Booking scheduler
//!
//! The transactional core: validates a booking request against policy and
//! availability, then atomically claims every requested unit. Validation is
//! ordered and short-circuits on the first failure; no mutation happens
//! before the claim, and the claim commits all sibling rows or none.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use super::hours::OpeningHoursService;
use crate::domain::booking::{Booking, BookingRequest, BookingStatus};
use crate::domain::policy::{BookingPolicy, Role};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct SchedulerService {
    repos: Arc<dyn RepositoryProvider>,
    policy: BookingPolicy,
    hours: OpeningHoursService,
}

impl SchedulerService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        policy: BookingPolicy,
        hours: OpeningHoursService,
    ) -> Self {
        Self {
            repos,
            policy,
            hours,
        }
    }

    /// Validate and atomically create one booking per requested unit.
    pub async fn create_booking(&self, request: BookingRequest) -> DomainResult<Vec<Booking>> {
        self.create_booking_at(request, Utc::now()).await
    }

    /// Clock-injected variant; `now` anchors the horizon check.
    #[instrument(skip(self, request), fields(requester = %request.requester_id, kind = %request.kind))]
    pub async fn create_booking_at(
        &self,
        request: BookingRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        // 1. Horizon
        self.policy
            .check_horizon(request.requester_role, now, request.start_ts)?;

        // 2. Duration / slot shape
        self.policy
            .check_duration(request.kind, request.duration())?;

        // 3. Opening hours, per unit so per-resource overrides apply
        for unit_id in &request.candidate_unit_ids {
            let open = self
                .hours
                .is_window_open(request.kind, Some(*unit_id), request.start_ts, request.end_ts)
                .await?;
            if !open {
                return Err(DomainError::validation(
                    "start_ts",
                    "requested window is outside opening hours",
                ));
            }
        }

        // 4. Capacity / group size
        self.policy.check_group_size(
            request.kind,
            request.candidate_unit_ids.len(),
            request.companion_ids.len(),
        )?;

        let mut seen = HashSet::new();
        for id in &request.candidate_unit_ids {
            if !seen.insert(*id) {
                return Err(DomainError::validation(
                    "candidate_unit_ids",
                    format!("unit {id} requested twice"),
                ));
            }
        }

        // Units must exist, match the kind and be in rotation.
        let units = self
            .repos
            .units()
            .find_by_ids(&request.candidate_unit_ids)
            .await?;
        let found: HashSet<Uuid> = units.iter().map(|u| u.id).collect();
        for id in &request.candidate_unit_ids {
            if !found.contains(id) {
                return Err(DomainError::not_found("ResourceUnit", "id", id));
            }
        }
        for unit in &units {
            if unit.kind != request.kind {
                return Err(DomainError::validation(
                    "candidate_unit_ids",
                    format!("unit {} is a {}, not a {}", unit.id, unit.kind, request.kind),
                ));
            }
            if !unit.accepts_bookings() {
                return Err(DomainError::validation(
                    "candidate_unit_ids",
                    format!("unit {} is not bookable ({})", unit.id, unit.status),
                ));
            }
        }

        // 5. Atomic claim: all sibling rows or none. The repository
        //    re-verifies availability inside one transaction.
        let group_id = Uuid::new_v4();
        let siblings: Vec<Booking> = request
            .candidate_unit_ids
            .iter()
            .map(|unit_id| {
                Booking::new(
                    group_id,
                    request.requester_id,
                    request.requester_id,
                    *unit_id,
                    request.start_ts,
                    request.end_ts,
                    request.companion_ids.clone(),
                    request.notes.clone(),
                )
            })
            .collect();

        let created = self.repos.bookings().claim_group(siblings).await?;
        info!(
            group_id = %group_id,
            units = created.len(),
            "Booking group created"
        );
        Ok(created)
    }

    /// Cancel a booking while it still holds its slot. The row is kept for
    /// penalty/audit history.
    pub async fn cancel_booking(
        &self,
        booking_id: Uuid,
        actor_id: Uuid,
        actor_role: Role,
    ) -> DomainResult<()> {
        let booking = self
            .repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", "id", booking_id))?;

        if booking.booked_by != actor_id && !matches!(actor_role, Role::Staff | Role::Admin) {
            return Err(DomainError::validation(
                "actor_id",
                "only the booker or staff may cancel a booking",
            ));
        }

        if !matches!(
            booking.status,
            BookingStatus::Pending | BookingStatus::Confirmed
        ) {
            return Err(DomainError::WrongState {
                entity: "Booking",
                current: booking.status.to_string(),
                attempted: "cancel",
            });
        }

        let moved = self
            .repos
            .bookings()
            .set_status_guarded(booking_id, booking.status, BookingStatus::Cancelled)
            .await?;
        if !moved {
            // Lost a race with check-in or the no-show sweep.
            let current = self
                .repos
                .bookings()
                .find_by_id(booking_id)
                .await?
                .map(|b| b.status.to_string())
                .unwrap_or_else(|| "unknown".into());
            return Err(DomainError::WrongState {
                entity: "Booking",
                current,
                attempted: "cancel",
            });
        }

        info!(booking_id = %booking_id, "Booking cancelled");
        Ok(())
    }

    /// All bookings for a user, newest start first.
    pub async fn list_user_bookings(&self, user_id: Uuid) -> DomainResult<Vec<Booking>> {
        self.repos.bookings().list_for_user(user_id).await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime, TimeZone};

    use crate::domain::opening_hours::OpeningHoursRule;
    use crate::domain::resource::{Location, ResourceDetails, ResourceKind, ResourceUnit};
    use crate::infrastructure::memory::InMemoryRepositoryProvider;
    use crate::shared::CampusClock;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    /// 2025-01-19 09:00 campus time (UTC+6) as the test "now"
    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 19, 3, 0, 0).unwrap()
    }

    /// 2025-01-20 HH:MM campus time, expressed in UTC
    fn campus(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 20, h, m, 0).unwrap() - Duration::hours(6)
    }

    fn seat(label: i32) -> ResourceUnit {
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
                seat_number: label,
            },
        )
    }

    async fn setup() -> (Arc<InMemoryRepositoryProvider>, SchedulerService, Vec<Uuid>) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let provider: Arc<dyn RepositoryProvider> = repos.clone();

        // Library open 08:00-20:00 every day of the week
        for day in 0..7 {
            provider
                .opening_hours()
                .save(OpeningHoursRule::open(
                    ResourceKind::LibrarySeat,
                    day,
                    t(8, 0),
                    t(20, 0),
                ))
                .await
                .unwrap();
        }

        let mut unit_ids = Vec::new();
        for n in 1..=6 {
            let unit = seat(n);
            unit_ids.push(unit.id);
            provider.units().save(unit).await.unwrap();
        }

        let hours = OpeningHoursService::new(provider.clone(), CampusClock::new(6));
        let scheduler = SchedulerService::new(provider, BookingPolicy::default(), hours);
        (repos, scheduler, unit_ids)
    }

    fn request(units: Vec<Uuid>, start: DateTime<Utc>, end: DateTime<Utc>) -> BookingRequest {
        BookingRequest {
            requester_id: Uuid::new_v4(),
            requester_role: Role::Student,
            kind: ResourceKind::LibrarySeat,
            candidate_unit_ids: units,
            start_ts: start,
            end_ts: end,
            companion_ids: vec![],
            notes: None,
        }
    }

    #[tokio::test]
    async fn two_seat_group_booking_succeeds_then_conflicts() {
        let (_repos, scheduler, units) = setup().await;

        // S1 + S2, 09:00-11:00 campus time on an empty schedule
        let created = scheduler
            .create_booking_at(
                request(vec![units[0], units[1]], campus(9, 0), campus(11, 0)),
                test_now(),
            )
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        let codes: HashSet<&str> = created.iter().map(|b| b.attendance_code.as_str()).collect();
        assert_eq!(codes.len(), 2, "sibling codes must be distinct");
        for b in &created {
            assert_eq!(b.status, BookingStatus::Confirmed);
            assert!(b.attendance_code.len() >= 10 && b.attendance_code.len() <= 16);
            assert_eq!(b.group_id, created[0].group_id);
        }

        // S1 again for 09:30-10:30 loses with a conflict naming S1
        let err = scheduler
            .create_booking_at(
                request(vec![units[0]], campus(9, 30), campus(10, 30)),
                test_now(),
            )
            .await
            .unwrap_err();
        match err {
            DomainError::Conflict { unit_ids } => assert_eq!(unit_ids, vec![units[0]]),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn back_to_back_bookings_do_not_conflict() {
        let (_repos, scheduler, units) = setup().await;

        scheduler
            .create_booking_at(
                request(vec![units[0]], campus(9, 0), campus(10, 0)),
                test_now(),
            )
            .await
            .unwrap();

        // Starts exactly when the first ends: half-open, no conflict
        let second = scheduler
            .create_booking_at(
                request(vec![units[0]], campus(10, 0), campus(11, 0)),
                test_now(),
            )
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn group_claim_is_all_or_nothing() {
        let (repos, scheduler, units) = setup().await;

        // Occupy unit 3 first
        scheduler
            .create_booking_at(
                request(vec![units[2]], campus(9, 0), campus(10, 0)),
                test_now(),
            )
            .await
            .unwrap();

        // Group of 3 including the taken unit fails entirely
        let err = scheduler
            .create_booking_at(
                request(
                    vec![units[0], units[1], units[2]],
                    campus(9, 0),
                    campus(10, 0),
                ),
                test_now(),
            )
            .await
            .unwrap_err();
        match err {
            DomainError::Conflict { unit_ids } => assert_eq!(unit_ids, vec![units[2]]),
            other => panic!("expected Conflict, got {other:?}"),
        }

        // Units 1 and 2 must have no bookings at all
        let conflicts = repos
            .bookings()
            .find_conflicting_units(&[units[0], units[1]], campus(9, 0), campus(10, 0))
            .await
            .unwrap();
        assert!(conflicts.is_empty(), "no partial group rows may exist");
    }

    #[tokio::test]
    async fn student_horizon_is_enforced() {
        let (_repos, scheduler, units) = setup().await;

        // 4 days ahead: rejected
        let start = campus(9, 0) + Duration::days(3); // = now + ~4 days
        let err = scheduler
            .create_booking_at(request(vec![units[0]], start, start + Duration::hours(1)), test_now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { field, .. } if field == "start_ts"));

        // ~1 day ahead: accepted
        let created = scheduler
            .create_booking_at(
                request(vec![units[0]], campus(9, 0), campus(10, 0)),
                test_now(),
            )
            .await
            .unwrap();
        assert_eq!(created.len(), 1);
    }

    #[tokio::test]
    async fn invalid_duration_is_rejected() {
        let (_repos, scheduler, units) = setup().await;
        let err = scheduler
            .create_booking_at(
                request(vec![units[0]], campus(9, 0), campus(10, 30)),
                test_now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { field, .. } if field == "duration"));
    }

    #[tokio::test]
    async fn window_outside_opening_hours_is_rejected() {
        let (_repos, scheduler, units) = setup().await;
        // Library opens at 08:00 campus time
        let err = scheduler
            .create_booking_at(
                request(vec![units[0]], campus(6, 0), campus(7, 0)),
                test_now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn missing_policy_fails_closed() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let provider: Arc<dyn RepositoryProvider> = repos.clone();
        let unit = seat(1);
        let unit_id = unit.id;
        provider.units().save(unit).await.unwrap();

        let hours = OpeningHoursService::new(provider.clone(), CampusClock::new(6));
        let scheduler = SchedulerService::new(provider, BookingPolicy::default(), hours);

        let err = scheduler
            .create_booking_at(
                request(vec![unit_id], campus(9, 0), campus(10, 0)),
                test_now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PolicyMissing { .. }));
    }

    #[tokio::test]
    async fn companions_bounded_by_units() {
        let (_repos, scheduler, units) = setup().await;
        let mut req = request(vec![units[0], units[1]], campus(9, 0), campus(10, 0));
        req.companion_ids = vec!["STU1001".into(), "STU1002".into()];
        let err = scheduler
            .create_booking_at(req, test_now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { field, .. } if field == "companion_ids"));
    }

    #[tokio::test]
    async fn cancel_then_rebook_frees_the_slot() {
        let (_repos, scheduler, units) = setup().await;
        let created = scheduler
            .create_booking_at(
                request(vec![units[0]], campus(9, 0), campus(10, 0)),
                test_now(),
            )
            .await
            .unwrap();
        let booking = &created[0];

        scheduler
            .cancel_booking(booking.id, booking.booked_by, Role::Student)
            .await
            .unwrap();

        // Cancelled bookings no longer hold the slot
        let rebooked = scheduler
            .create_booking_at(
                request(vec![units[0]], campus(9, 0), campus(10, 0)),
                test_now(),
            )
            .await
            .unwrap();
        assert_eq!(rebooked.len(), 1);
    }

    #[tokio::test]
    async fn cancel_is_rejected_for_foreign_user_and_terminal_state() {
        let (_repos, scheduler, units) = setup().await;
        let created = scheduler
            .create_booking_at(
                request(vec![units[0]], campus(9, 0), campus(10, 0)),
                test_now(),
            )
            .await
            .unwrap();
        let booking = &created[0];

        // Another student cannot cancel
        let err = scheduler
            .cancel_booking(booking.id, Uuid::new_v4(), Role::Student)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));

        // Staff can
        scheduler
            .cancel_booking(booking.id, Uuid::new_v4(), Role::Staff)
            .await
            .unwrap();

        // Second cancel hits a terminal state
        let err = scheduler
            .cancel_booking(booking.id, booking.booked_by, Role::Student)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::WrongState { .. }));
    }

    #[tokio::test]
    async fn concurrent_claims_never_double_book() {
        let (repos, scheduler, units) = setup().await;
        let scheduler = Arc::new(scheduler);

        // Many tasks race for the same two seats over the same window
        let mut handles = Vec::new();
        for _ in 0..16 {
            let scheduler = scheduler.clone();
            let target = vec![units[0], units[1]];
            handles.push(tokio::spawn(async move {
                scheduler
                    .create_booking_at(request(target, campus(9, 0), campus(11, 0)), test_now())
                    .await
            }));
        }

        let mut successes = 0;
        for h in handles {
            if h.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1, "exactly one claim may win");

        // And the winner holds both seats exactly once
        let conflicts = repos
            .bookings()
            .find_conflicting_units(&[units[0], units[1]], campus(9, 0), campus(11, 0))
            .await
            .unwrap();
        assert_eq!(conflicts.len(), 2);
    }
}
