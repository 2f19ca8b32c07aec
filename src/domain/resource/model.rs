//! Resource catalog domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of bookable resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    LibrarySeat,
    EquipmentUnit,
    Room,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LibrarySeat => "library_seat",
            Self::EquipmentUnit => "equipment_unit",
            Self::Room => "room",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "library_seat" => Some(Self::LibrarySeat),
            "equipment_unit" => Some(Self::EquipmentUnit),
            "room" => Some(Self::Room),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operational status of a single unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    /// Free to book
    Available,
    /// Someone has checked in on this unit
    InUse,
    /// Pulled out of rotation for repairs
    Maintenance,
    /// Administratively disabled
    Inactive,
}

impl UnitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InUse => "in_use",
            Self::Maintenance => "maintenance",
            Self::Inactive => "inactive",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "available" => Self::Available,
            "in_use" => Self::InUse,
            "maintenance" => Self::Maintenance,
            _ => Self::Inactive,
        }
    }

    /// Units out of rotation never appear in availability results.
    pub fn is_bookable(&self) -> bool {
        matches!(self, Self::Available | Self::InUse)
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Physical location of a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub building: String,
    pub room_code: String,
    pub floor: i32,
}

/// Per-kind unit metadata, tagged by `ResourceKind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceDetails {
    Seat {
        table_label: String,
        seat_number: i32,
    },
    Equipment {
        asset_tag: String,
    },
    Room {
        capacity: i32,
        purpose: String,
    },
}

impl ResourceDetails {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Seat { .. } => ResourceKind::LibrarySeat,
            Self::Equipment { .. } => ResourceKind::EquipmentUnit,
            Self::Room { .. } => ResourceKind::Room,
        }
    }
}

/// A single bookable thing: one seat, one equipment item, one room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceUnit {
    pub id: Uuid,
    pub kind: ResourceKind,
    /// Table for seats, equipment type for units, none for rooms
    pub parent_id: Option<Uuid>,
    pub status: UnitStatus,
    pub location: Location,
    pub details: ResourceDetails,
    pub created_at: DateTime<Utc>,
    /// Soft retirement; retired units stay referenced by historical bookings
    pub retired_at: Option<DateTime<Utc>>,
}

impl ResourceUnit {
    pub fn new(
        kind: ResourceKind,
        parent_id: Option<Uuid>,
        location: Location,
        details: ResourceDetails,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            parent_id,
            status: UnitStatus::Available,
            location,
            details,
            created_at: Utc::now(),
            retired_at: None,
        }
    }

    pub fn retire(&mut self) {
        self.retired_at = Some(Utc::now());
        self.status = UnitStatus::Inactive;
    }

    pub fn is_retired(&self) -> bool {
        self.retired_at.is_some()
    }

    /// A unit can take new bookings only while active and not retired.
    pub fn accepts_bookings(&self) -> bool {
        !self.is_retired() && self.status.is_bookable()
    }
}

// ── Tests ──────────────────────────────────────────────────────
