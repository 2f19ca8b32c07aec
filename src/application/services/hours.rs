//! Opening-hours policy evaluation
//!
//! Validates requested windows against the weekly rule set, in campus-local
//! time. A window spanning midnight is split into per-day segments, each of
//! which must be fully open. Absence of any rule for a kind fails closed
//! with `PolicyMissing` rather than silently allowing the booking.

use std::sync::Arc;

use chrono::{DateTime, Days, NaiveTime, TimeZone, Utc};
use tracing::error;
use uuid::Uuid;

use crate::domain::opening_hours::OpeningHoursRule;
use crate::domain::resource::ResourceKind;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::CampusClock;

pub struct OpeningHoursService {
    repos: Arc<dyn RepositoryProvider>,
    clock: CampusClock,
}

impl OpeningHoursService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: CampusClock) -> Self {
        Self { repos, clock }
    }

    /// Whether [start, end) is fully inside configured open hours for the
    /// kind (with per-resource overrides when `resource_id` is given).
    pub async fn is_window_open(
        &self,
        kind: ResourceKind,
        resource_id: Option<Uuid>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<bool> {
        if end <= start {
            return Ok(false);
        }

        if !self.repos.opening_hours().has_rules_for_kind(kind).await? {
            error!(kind = %kind, "No opening-hours rules configured; refusing to book");
            return Err(DomainError::PolicyMissing { kind });
        }

        // Walk the window one campus-local day at a time.
        let mut seg_start = start;
        while seg_start < end {
            let local_date = self.clock.local_date(seg_start);
            let next_midnight = self.next_local_midnight(seg_start);
            let seg_end = end.min(next_midnight);

            let from = self.clock.local_time(seg_start);
            let to = if seg_end == next_midnight {
                // Segment runs to the end of the local day.
                NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
            } else {
                self.clock.local_time(seg_end)
            };

            let day = self.clock.day_of_week(seg_start);
            let rules = self
                .repos
                .opening_hours()
                .find_for_day(kind, resource_id, day)
                .await?;

            if !segment_open(&rules, resource_id, from, to) {
                tracing::debug!(
                    kind = %kind,
                    date = %local_date,
                    %from, %to,
                    "Requested window falls outside opening hours"
                );
                return Ok(false);
            }

            seg_start = seg_end;
        }

        Ok(true)
    }

    fn next_local_midnight(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let local = self.clock.to_local(ts);
        let next_day = local
            .date_naive()
            .checked_add_days(Days::new(1))
            .unwrap_or(local.date_naive());
        match local
            .timezone()
            .from_local_datetime(&next_day.and_time(NaiveTime::MIN))
        {
            chrono::LocalResult::Single(dt) => dt.with_timezone(&Utc),
            // Fixed offsets never produce ambiguous local times; keep the
            // loop advancing regardless
            _ => ts + chrono::Duration::days(1),
        }
    }
}

/// Evaluate one same-day segment against the applicable rules.
///
/// Per-resource rules take precedence over kind-level rules for the day;
/// an `is_closed` rule among the applicable set closes the day outright;
/// no applicable rule at all means closed.
fn segment_open(
    rules: &[OpeningHoursRule],
    resource_id: Option<Uuid>,
    from: NaiveTime,
    to: NaiveTime,
) -> bool {
    let resource_specific: Vec<&OpeningHoursRule> = rules
        .iter()
        .filter(|r| r.resource_id.is_some() && r.resource_id == resource_id)
        .collect();

    let applicable: Vec<&OpeningHoursRule> = if resource_specific.is_empty() {
        rules.iter().filter(|r| r.resource_id.is_none()).collect()
    } else {
        resource_specific
    };

    if applicable.is_empty() || applicable.iter().any(|r| r.is_closed) {
        return false;
    }

    applicable.iter().any(|r| r.covers(from, to))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn open_rule(day: u8, from: NaiveTime, to: NaiveTime) -> OpeningHoursRule {
        OpeningHoursRule::open(ResourceKind::LibrarySeat, day, from, to)
    }

    #[test]
    fn segment_open_inside_kind_rule() {
        let rules = vec![open_rule(1, t(8, 0), t(20, 0))];
        assert!(segment_open(&rules, None, t(9, 0), t(11, 0)));
        assert!(!segment_open(&rules, None, t(7, 0), t(9, 0)));
    }

    #[test]
    fn no_applicable_rule_means_closed() {
        assert!(!segment_open(&[], None, t(9, 0), t(10, 0)));
    }

    #[test]
    fn is_closed_overrides_open_rule() {
        let rules = vec![
            open_rule(5, t(8, 0), t(20, 0)),
            OpeningHoursRule::closed(ResourceKind::LibrarySeat, 5),
        ];
        assert!(!segment_open(&rules, None, t(9, 0), t(10, 0)));
    }

    #[test]
    fn resource_override_takes_precedence() {
        let id = Uuid::new_v4();
        let rules = vec![
            open_rule(1, t(8, 0), t(20, 0)),
            open_rule(1, t(10, 0), t(12, 0)).for_resource(id),
        ];
        // override narrows this resource's hours
        assert!(!segment_open(&rules, Some(id), t(8, 30), t(9, 30)));
        assert!(segment_open(&rules, Some(id), t(10, 0), t(12, 0)));
        // other resources keep the kind-level hours
        assert!(segment_open(&rules, Some(Uuid::new_v4()), t(8, 30), t(9, 30)));
        assert!(segment_open(&rules, None, t(8, 30), t(9, 30)));
    }

    mod service {
        use super::*;
        use std::sync::Arc;

        use chrono::{DateTime, Duration, TimeZone, Utc};

        use crate::domain::RepositoryProvider;
        use crate::infrastructure::memory::InMemoryRepositoryProvider;

        /// 2025-01-20 HH:MM campus time (UTC+6), expressed in UTC
        fn campus(h: u32, m: u32) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 1, 20, h, m, 0).unwrap() - Duration::hours(6)
        }

        async fn service_with_weekday_hours() -> OpeningHoursService {
            let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
            for day in 0..7 {
                repos
                    .opening_hours()
                    .save(open_rule(day, t(8, 0), t(20, 0)))
                    .await
                    .unwrap();
            }
            OpeningHoursService::new(repos, crate::shared::CampusClock::new(6))
        }

        #[tokio::test]
        async fn window_inside_hours_is_open() {
            let svc = service_with_weekday_hours().await;
            let open = svc
                .is_window_open(ResourceKind::LibrarySeat, None, campus(9, 0), campus(11, 0))
                .await
                .unwrap();
            assert!(open);
        }

        #[tokio::test]
        async fn window_spanning_midnight_is_evaluated_per_day() {
            let svc = service_with_weekday_hours().await;
            // 23:00 Monday to 01:00 Tuesday campus time: neither segment is
            // inside the 08:00-20:00 hours, and nothing crashes.
            let open = svc
                .is_window_open(
                    ResourceKind::LibrarySeat,
                    None,
                    campus(23, 0),
                    campus(23, 0) + Duration::hours(2),
                )
                .await
                .unwrap();
            assert!(!open);
        }

        #[tokio::test]
        async fn missing_policy_for_kind_errors() {
            let svc = service_with_weekday_hours().await;
            // No rules exist for rooms at all
            let err = svc
                .is_window_open(ResourceKind::Room, None, campus(9, 0), campus(10, 0))
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::PolicyMissing { .. }));
        }

        #[tokio::test]
        async fn inverted_window_is_closed() {
            let svc = service_with_weekday_hours().await;
            let open = svc
                .is_window_open(ResourceKind::LibrarySeat, None, campus(11, 0), campus(9, 0))
                .await
                .unwrap();
            assert!(!open);
        }
    }
}
