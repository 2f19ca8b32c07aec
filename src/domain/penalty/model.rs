//! No-show penalty domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyStatus {
    Pending,
    Waived,
    Paid,
}

impl PenaltyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Waived => "waived",
            Self::Paid => "paid",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "waived" => Self::Waived,
            "paid" => Self::Paid,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for PenaltyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fee issued when a confirmed booking's check-in window elapses with no
/// arrival. One penalty per no-show booking; settled only by explicit admin
/// action (waive or mark paid).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Penalty {
    pub id: Uuid,
    pub user_id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub reason: String,
    pub status: PenaltyStatus,
    pub created_at: DateTime<Utc>,
}

impl Penalty {
    pub fn new(user_id: Uuid, booking_id: Uuid, amount: Decimal, reason: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            booking_id,
            amount,
            reason,
            status: PenaltyStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Settlement transitions are only valid from Pending.
    pub fn can_settle(&self) -> bool {
        self.status == PenaltyStatus::Pending
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_penalty_is_pending() {
        let p = Penalty::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Decimal::from(200),
            "No-show for library seat booking (2 hours)".into(),
        );
        assert_eq!(p.status, PenaltyStatus::Pending);
        assert!(p.can_settle());
        assert_eq!(p.amount, Decimal::from(200));
    }

    #[test]
    fn settled_penalty_cannot_settle_again() {
        let mut p = Penalty::new(Uuid::new_v4(), Uuid::new_v4(), Decimal::from(100), "x".into());
        p.status = PenaltyStatus::Waived;
        assert!(!p.can_settle());
        p.status = PenaltyStatus::Paid;
        assert!(!p.can_settle());
    }

    #[test]
    fn status_roundtrip() {
        for s in [
            PenaltyStatus::Pending,
            PenaltyStatus::Waived,
            PenaltyStatus::Paid,
        ] {
            assert_eq!(PenaltyStatus::from_str(s.as_str()), s);
        }
    }
}
