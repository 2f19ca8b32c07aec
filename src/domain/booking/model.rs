//! Booking domain entity and status state machine

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::policy::Role;
use crate::domain::resource::ResourceKind;

/// Booking status state machine.
///
/// Holding statuses (Pending, Confirmed, Arrived) block the unit's time
/// slot; Completed, Cancelled and NoShow are terminal and never reactivate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created but awaiting confirmation (unused in the default flow,
    /// kept so an approval step can be added without a schema change)
    Pending,
    /// Slot is held; check-in expected around start
    Confirmed,
    /// Checked in within the attendance window
    Arrived,
    /// Attended and past end
    Completed,
    /// Withdrawn before arrival
    Cancelled,
    /// Check-in window elapsed with no arrival
    NoShow,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Arrived => "arrived",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "arrived" => Self::Arrived,
            "completed" => Self::Completed,
            "no_show" => Self::NoShow,
            _ => Self::Cancelled,
        }
    }

    /// Statuses that still block the unit's time slot
    pub fn is_holding(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Arrived)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Legal transitions of the state machine
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Arrived)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
                | (Arrived, Completed)
        )
    }

    /// Every holding status string, for overlap queries
    pub fn holding_strs() -> [&'static str; 3] {
        ["pending", "confirmed", "arrived"]
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 10;

/// Generate a fresh attendance code: 10 uppercase alphanumeric characters.
pub fn generate_attendance_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// An incoming booking request, validated and consumed by the scheduler.
/// Never persisted as-is.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub requester_id: Uuid,
    pub requester_role: Role,
    pub kind: ResourceKind,
    pub candidate_unit_ids: Vec<Uuid>,
    pub start_ts: DateTime<Utc>,
    pub end_ts: DateTime<Utc>,
    /// External identifiers of companions (not FK'd)
    pub companion_ids: Vec<String>,
    pub notes: Option<String>,
}

impl BookingRequest {
    pub fn duration(&self) -> Duration {
        self.end_ts - self.start_ts
    }
}

/// Persistent booking record; one row per reserved unit. Sibling rows of a
/// group booking share `group_id` and are created atomically together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub group_id: Uuid,
    pub booked_by: Uuid,
    /// Defaults to `booked_by`; distinguishes group-booking members
    pub booked_for: Uuid,
    pub resource_unit_id: Uuid,
    pub start_ts: DateTime<Utc>,
    pub end_ts: DateTime<Utc>,
    pub status: BookingStatus,
    pub attendance_code: String,
    pub companions: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        group_id: Uuid,
        booked_by: Uuid,
        booked_for: Uuid,
        resource_unit_id: Uuid,
        start_ts: DateTime<Utc>,
        end_ts: DateTime<Utc>,
        companions: Vec<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            booked_by,
            booked_for,
            resource_unit_id,
            start_ts,
            end_ts,
            status: BookingStatus::Confirmed,
            attendance_code: generate_attendance_code(),
            companions,
            notes,
            created_at: Utc::now(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.end_ts - self.start_ts
    }

    /// Half-open interval overlap: [a0, a1) and [b0, b1) overlap iff
    /// a0 < b1 && b0 < a1. Back-to-back bookings do not conflict.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_ts < end && start < self.end_ts
    }

    /// Whether `now` falls inside the check-in window around start.
    pub fn within_checkin_window(&self, now: DateTime<Utc>, window_minutes: i64) -> bool {
        let delta = (now - self.start_ts).num_minutes().abs();
        delta <= window_minutes
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 20, h, m, 0).unwrap()
    }

    fn sample_booking(start: DateTime<Utc>, end: DateTime<Utc>) -> Booking {
        Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            start,
            end,
            vec![],
            None,
        )
    }

    #[test]
    fn new_booking_is_confirmed_with_code() {
        let b = sample_booking(ts(9, 0), ts(11, 0));
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert!(b.attendance_code.len() >= 10 && b.attendance_code.len() <= 16);
        assert!(b
            .attendance_code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn codes_are_distinct() {
        let a = generate_attendance_code();
        let b = generate_attendance_code();
        assert_ne!(a, b);
    }

    #[test]
    fn overlap_is_half_open() {
        let b = sample_booking(ts(9, 0), ts(10, 0));
        // Touching at the boundary does not conflict
        assert!(!b.overlaps(ts(10, 0), ts(11, 0)));
        assert!(!b.overlaps(ts(8, 0), ts(9, 0)));
        // Proper overlaps do
        assert!(b.overlaps(ts(9, 30), ts(10, 30)));
        assert!(b.overlaps(ts(8, 30), ts(9, 30)));
        assert!(b.overlaps(ts(9, 15), ts(9, 45)));
        assert!(b.overlaps(ts(8, 0), ts(11, 0)));
    }

    #[test]
    fn holding_statuses_block_slots() {
        assert!(BookingStatus::Pending.is_holding());
        assert!(BookingStatus::Confirmed.is_holding());
        assert!(BookingStatus::Arrived.is_holding());
        assert!(!BookingStatus::Completed.is_holding());
        assert!(!BookingStatus::Cancelled.is_holding());
        assert!(!BookingStatus::NoShow.is_holding());
    }

    #[test]
    fn terminal_states_never_reactivate() {
        use BookingStatus::*;
        for terminal in [Completed, Cancelled, NoShow] {
            for next in [Pending, Confirmed, Arrived, Completed, Cancelled, NoShow] {
                assert!(
                    !terminal.can_transition_to(next),
                    "{terminal} -> {next} must be illegal"
                );
            }
        }
    }

    #[test]
    fn legal_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Arrived));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(NoShow));
        assert!(Arrived.can_transition_to(Completed));
        // Skipping states is illegal
        assert!(!Pending.can_transition_to(Arrived));
        assert!(!Confirmed.can_transition_to(Completed));
        assert!(!Arrived.can_transition_to(NoShow));
        assert!(!Arrived.can_transition_to(Cancelled));
    }

    #[test]
    fn status_roundtrip() {
        use BookingStatus::*;
        for s in [Pending, Confirmed, Arrived, Completed, Cancelled, NoShow] {
            assert_eq!(BookingStatus::from_str(s.as_str()), s);
        }
    }

    #[test]
    fn checkin_window_is_symmetric() {
        let b = sample_booking(ts(9, 0), ts(10, 0));
        assert!(b.within_checkin_window(ts(9, 0), 15));
        assert!(b.within_checkin_window(ts(8, 45), 15));
        assert!(b.within_checkin_window(ts(9, 15), 15));
        assert!(!b.within_checkin_window(ts(8, 44), 15));
        assert!(!b.within_checkin_window(ts(9, 16), 15));
    }
}
