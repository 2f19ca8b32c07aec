//! Booking policy: horizons, duration rules, capacity limits, penalty rates.
//!
//! Pure functions over configuration values; the scheduler runs these before
//! touching storage. All knobs default to the campus rules (students book
//! 3 days ahead, faculty 7; library slots are 1 or 2 hours; lab equipment is
//! booked by the hour; rooms 45-75 minutes) and can be overridden in the
//! TOML config.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::resource::ResourceKind;

/// Caller role, passed explicitly into every engine call. The engine holds
/// no ambient session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Faculty,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Self::Student),
            "faculty" => Some(Self::Faculty),
            "staff" => Some(Self::Staff),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Duration rule for one resource kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DurationRule {
    /// Duration must equal one of these exact values (minutes)
    ExactMinutes(Vec<i64>),
    /// Duration must fall inside [min, max] minutes inclusive
    RangeMinutes { min: i64, max: i64 },
}

impl DurationRule {
    pub fn allows(&self, duration: Duration) -> bool {
        let minutes = duration.num_minutes();
        // Sub-minute remainders never pass an exact rule
        if duration != Duration::minutes(minutes) {
            return false;
        }
        match self {
            Self::ExactMinutes(allowed) => allowed.contains(&minutes),
            Self::RangeMinutes { min, max } => (*min..=*max).contains(&minutes),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::ExactMinutes(allowed) => {
                let opts: Vec<String> = allowed.iter().map(|m| format!("{m}")).collect();
                format!("exactly {} minutes", opts.join(" or "))
            }
            Self::RangeMinutes { min, max } => format!("{min}-{max} minutes"),
        }
    }
}

/// All scheduling policy knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingPolicy {
    /// Advance-booking window per role, in days
    pub student_horizon_days: i64,
    pub faculty_horizon_days: i64,
    pub staff_horizon_days: i64,
    pub admin_horizon_days: i64,

    /// Maximum units claimable in one group request, per kind
    pub library_max_units: usize,
    pub equipment_max_units: usize,
    pub room_max_units: usize,

    /// Maximum companions per request
    pub max_companions: usize,

    /// No-show penalty rates per hour, per kind
    pub library_rate_per_hour: Decimal,
    pub equipment_rate_per_hour: Decimal,
    pub room_rate_per_hour: Decimal,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            student_horizon_days: 3,
            faculty_horizon_days: 7,
            staff_horizon_days: 7,
            admin_horizon_days: 30,
            library_max_units: 6,
            equipment_max_units: 1,
            room_max_units: 1,
            max_companions: 5,
            library_rate_per_hour: Decimal::from(100),
            equipment_rate_per_hour: Decimal::from(200),
            room_rate_per_hour: Decimal::from(150),
        }
    }
}

impl BookingPolicy {
    pub fn horizon_days(&self, role: Role) -> i64 {
        match role {
            Role::Student => self.student_horizon_days,
            Role::Faculty => self.faculty_horizon_days,
            Role::Staff => self.staff_horizon_days,
            Role::Admin => self.admin_horizon_days,
        }
    }

    pub fn duration_rule(&self, kind: ResourceKind) -> DurationRule {
        match kind {
            ResourceKind::LibrarySeat => DurationRule::ExactMinutes(vec![60, 120]),
            ResourceKind::EquipmentUnit => DurationRule::ExactMinutes(vec![60]),
            ResourceKind::Room => DurationRule::RangeMinutes { min: 45, max: 75 },
        }
    }

    pub fn max_units(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::LibrarySeat => self.library_max_units,
            ResourceKind::EquipmentUnit => self.equipment_max_units,
            ResourceKind::Room => self.room_max_units,
        }
    }

    pub fn rate_per_hour(&self, kind: ResourceKind) -> Decimal {
        match kind {
            ResourceKind::LibrarySeat => self.library_rate_per_hour,
            ResourceKind::EquipmentUnit => self.equipment_rate_per_hour,
            ResourceKind::Room => self.room_rate_per_hour,
        }
    }

    /// Penalty for one no-show booking: hourly rate x booked hours.
    /// Each sibling booking of a group is billed separately.
    pub fn penalty_amount(&self, kind: ResourceKind, duration: Duration) -> Decimal {
        let hours = Decimal::from(duration.num_minutes()) / Decimal::from(60);
        self.rate_per_hour(kind) * hours
    }

    /// Validate `start_ts` against the role's advance window. `now` is
    /// injected so tests control the clock.
    pub fn check_horizon(
        &self,
        role: Role,
        now: chrono::DateTime<chrono::Utc>,
        start_ts: chrono::DateTime<chrono::Utc>,
    ) -> DomainResult<()> {
        if start_ts < now {
            return Err(DomainError::validation(
                "start_ts",
                "booking start is in the past",
            ));
        }
        let horizon = Duration::days(self.horizon_days(role));
        if start_ts - now > horizon {
            return Err(DomainError::validation(
                "start_ts",
                format!(
                    "{} bookings are limited to {} days ahead",
                    role,
                    self.horizon_days(role)
                ),
            ));
        }
        Ok(())
    }

    pub fn check_duration(&self, kind: ResourceKind, duration: Duration) -> DomainResult<()> {
        if duration <= Duration::zero() {
            return Err(DomainError::validation(
                "end_ts",
                "end must be after start",
            ));
        }
        let rule = self.duration_rule(kind);
        if !rule.allows(duration) {
            return Err(DomainError::validation(
                "duration",
                format!("{} bookings must be {}", kind, rule.describe()),
            ));
        }
        Ok(())
    }

    pub fn check_group_size(
        &self,
        kind: ResourceKind,
        unit_count: usize,
        companion_count: usize,
    ) -> DomainResult<()> {
        let max = self.max_units(kind);
        if unit_count == 0 {
            return Err(DomainError::validation(
                "candidate_unit_ids",
                "at least one unit is required",
            ));
        }
        if unit_count > max {
            return Err(DomainError::validation(
                "candidate_unit_ids",
                format!("at most {max} {kind} units per booking"),
            ));
        }
        if companion_count > self.max_companions {
            return Err(DomainError::validation(
                "companion_ids",
                format!("at most {} companions per booking", self.max_companions),
            ));
        }
        // One person per claimed unit: requester + companions <= units
        if companion_count + 1 > unit_count {
            return Err(DomainError::validation(
                "companion_ids",
                "companions cannot exceed units minus one",
            ));
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 20, 8, 0, 0).unwrap()
    }

    #[test]
    fn student_horizon_is_three_days() {
        let p = BookingPolicy::default();
        // now + 2 days is accepted
        assert!(p
            .check_horizon(Role::Student, now(), now() + Duration::days(2))
            .is_ok());
        // now + 4 days is rejected
        let err = p
            .check_horizon(Role::Student, now(), now() + Duration::days(4))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { field, .. } if field == "start_ts"));
    }

    #[test]
    fn faculty_horizon_is_seven_days() {
        let p = BookingPolicy::default();
        assert!(p
            .check_horizon(Role::Faculty, now(), now() + Duration::days(6))
            .is_ok());
        assert!(p
            .check_horizon(Role::Faculty, now(), now() + Duration::days(8))
            .is_err());
    }

    #[test]
    fn past_start_is_rejected() {
        let p = BookingPolicy::default();
        assert!(p
            .check_horizon(Role::Admin, now(), now() - Duration::minutes(1))
            .is_err());
    }

    #[test]
    fn library_durations_are_one_or_two_hours() {
        let p = BookingPolicy::default();
        assert!(p
            .check_duration(ResourceKind::LibrarySeat, Duration::minutes(60))
            .is_ok());
        assert!(p
            .check_duration(ResourceKind::LibrarySeat, Duration::minutes(120))
            .is_ok());
        assert!(p
            .check_duration(ResourceKind::LibrarySeat, Duration::minutes(90))
            .is_err());
        assert!(p
            .check_duration(ResourceKind::LibrarySeat, Duration::minutes(180))
            .is_err());
    }

    #[test]
    fn equipment_duration_is_exactly_one_hour() {
        let p = BookingPolicy::default();
        assert!(p
            .check_duration(ResourceKind::EquipmentUnit, Duration::minutes(60))
            .is_ok());
        assert!(p
            .check_duration(ResourceKind::EquipmentUnit, Duration::minutes(120))
            .is_err());
    }

    #[test]
    fn room_duration_is_45_to_75_minutes_inclusive() {
        let p = BookingPolicy::default();
        assert!(p
            .check_duration(ResourceKind::Room, Duration::minutes(45))
            .is_ok());
        assert!(p
            .check_duration(ResourceKind::Room, Duration::minutes(60))
            .is_ok());
        assert!(p
            .check_duration(ResourceKind::Room, Duration::minutes(75))
            .is_ok());
        assert!(p
            .check_duration(ResourceKind::Room, Duration::minutes(44))
            .is_err());
        assert!(p
            .check_duration(ResourceKind::Room, Duration::minutes(76))
            .is_err());
    }

    #[test]
    fn zero_or_negative_duration_is_rejected() {
        let p = BookingPolicy::default();
        assert!(p
            .check_duration(ResourceKind::Room, Duration::zero())
            .is_err());
        assert!(p
            .check_duration(ResourceKind::Room, Duration::minutes(-60))
            .is_err());
    }

    #[test]
    fn library_group_size_limits() {
        let p = BookingPolicy::default();
        assert!(p.check_group_size(ResourceKind::LibrarySeat, 6, 5).is_ok());
        assert!(p.check_group_size(ResourceKind::LibrarySeat, 7, 0).is_err());
        assert!(p.check_group_size(ResourceKind::LibrarySeat, 0, 0).is_err());
        // companions bounded by units - 1
        assert!(p.check_group_size(ResourceKind::LibrarySeat, 2, 2).is_err());
        assert!(p.check_group_size(ResourceKind::LibrarySeat, 3, 2).is_ok());
        // absolute companion cap
        assert!(p.check_group_size(ResourceKind::LibrarySeat, 6, 6).is_err());
    }

    #[test]
    fn equipment_is_single_unit() {
        let p = BookingPolicy::default();
        assert!(p
            .check_group_size(ResourceKind::EquipmentUnit, 1, 0)
            .is_ok());
        assert!(p
            .check_group_size(ResourceKind::EquipmentUnit, 2, 0)
            .is_err());
    }

    #[test]
    fn penalty_is_rate_times_hours() {
        let p = BookingPolicy::default();
        // library: 100/h -> 2h = 200
        assert_eq!(
            p.penalty_amount(ResourceKind::LibrarySeat, Duration::hours(2)),
            Decimal::from(200)
        );
        // equipment: 200/h -> 1h = 200
        assert_eq!(
            p.penalty_amount(ResourceKind::EquipmentUnit, Duration::hours(1)),
            Decimal::from(200)
        );
        // room: 150/h -> 60 min = 150
        assert_eq!(
            p.penalty_amount(ResourceKind::Room, Duration::minutes(60)),
            Decimal::from(150)
        );
    }
}
