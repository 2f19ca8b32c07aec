//! Weekly opening-hours rules

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::resource::ResourceKind;

/// One weekly open/closed window for a resource kind, optionally narrowed
/// to a single resource. Immutable per effective period; the scheduler only
/// reads these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningHoursRule {
    pub id: Uuid,
    pub kind: ResourceKind,
    /// Per-resource override; rules with a resource_id take precedence over
    /// kind-level rules for that resource and day
    pub resource_id: Option<Uuid>,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u8,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    /// Closes the day outright, overriding an otherwise-open slot
    pub is_closed: bool,
}

impl OpeningHoursRule {
    pub fn open(
        kind: ResourceKind,
        day_of_week: u8,
        open_time: NaiveTime,
        close_time: NaiveTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            resource_id: None,
            day_of_week,
            open_time,
            close_time,
            is_closed: false,
        }
    }

    pub fn closed(kind: ResourceKind, day_of_week: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            resource_id: None,
            day_of_week,
            open_time: NaiveTime::MIN,
            close_time: NaiveTime::MIN,
            is_closed: true,
        }
    }

    pub fn for_resource(mut self, resource_id: Uuid) -> Self {
        self.resource_id = Some(resource_id);
        self
    }

    /// Whether [from, to] (campus-local times, same day) sits fully inside
    /// this rule's open window.
    pub fn covers(&self, from: NaiveTime, to: NaiveTime) -> bool {
        !self.is_closed && self.open_time <= from && to <= self.close_time
    }
}

// ── Tests ──────────────────────────────────────────────────────
