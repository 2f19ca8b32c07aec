//! Campus-local time helpers
//!
//! Timestamps are stored in UTC; every policy window (opening hours,
//! booking horizons, check-in windows) is evaluated in the campus timezone,
//! a fixed offset from UTC (+6 by default, no DST on campus).

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Utc};

/// Converts stored UTC timestamps into campus-local wall-clock values.
#[derive(Debug, Clone, Copy)]
pub struct CampusClock {
    offset: FixedOffset,
}

impl CampusClock {
    /// `offset_hours` east of UTC; out-of-range values fall back to UTC+6.
    pub fn new(offset_hours: i32) -> Self {
        let offset = FixedOffset::east_opt(offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(6 * 3600).unwrap());
        Self { offset }
    }

    pub fn to_local(&self, ts: DateTime<Utc>) -> DateTime<FixedOffset> {
        ts.with_timezone(&self.offset)
    }

    /// Campus-local weekday, 0 = Sunday .. 6 = Saturday
    pub fn day_of_week(&self, ts: DateTime<Utc>) -> u8 {
        self.to_local(ts).weekday().num_days_from_sunday() as u8
    }

    pub fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        self.to_local(ts).date_naive()
    }

    pub fn local_time(&self, ts: DateTime<Utc>) -> NaiveTime {
        self.to_local(ts).time()
    }
}

impl Default for CampusClock {
    fn default() -> Self {
        Self::new(6)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn converts_utc_to_campus_local() {
        let clock = CampusClock::new(6);
        // 2025-01-20 is a Monday; 03:00 UTC = 09:00 UTC+6
        let ts = Utc.with_ymd_and_hms(2025, 1, 20, 3, 0, 0).unwrap();
        assert_eq!(clock.local_time(ts), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(clock.day_of_week(ts), 1); // Monday
    }

    #[test]
    fn offset_can_roll_the_date_forward() {
        let clock = CampusClock::new(6);
        // 20:00 UTC Sunday = 02:00 Monday on campus
        let ts = Utc.with_ymd_and_hms(2025, 1, 19, 20, 0, 0).unwrap();
        assert_eq!(clock.day_of_week(ts), 1);
        assert_eq!(
            clock.local_date(ts),
            NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
        );
    }

    #[test]
    fn invalid_offset_falls_back_to_utc_plus_six() {
        let clock = CampusClock::new(99);
        let ts = Utc.with_ymd_and_hms(2025, 1, 20, 3, 0, 0).unwrap();
        assert_eq!(clock.local_time(ts), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }
}
