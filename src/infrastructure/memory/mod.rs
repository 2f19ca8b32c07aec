//! In-memory repository provider
//!
//! Thread-safe maps behind one RwLock. Backs the service test suites and
//! works as a throwaway backend for local experiments. The claim takes the
//! write lock across re-check and insert, so it gives the same
//! all-or-nothing guarantee as the database transaction.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingRepository, BookingStatus};
use crate::domain::opening_hours::{OpeningHoursRepository, OpeningHoursRule};
use crate::domain::penalty::{Penalty, PenaltyRepository, PenaltyStatus};
use crate::domain::resource::{
    ResourceKind, ResourceUnit, ResourceUnitRepository, UnitFilter, UnitStatus,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

#[derive(Default)]
struct Store {
    units: HashMap<Uuid, ResourceUnit>,
    bookings: HashMap<Uuid, Booking>,
    penalties: HashMap<Uuid, Penalty>,
    rules: Vec<OpeningHoursRule>,
}

type SharedStore = Arc<RwLock<Store>>;

fn lock_poisoned() -> DomainError {
    DomainError::Transient("in-memory store lock poisoned".to_string())
}

pub struct InMemoryRepositoryProvider {
    units: MemResourceUnitRepository,
    bookings: MemBookingRepository,
    penalties: MemPenaltyRepository,
    opening_hours: MemOpeningHoursRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let store: SharedStore = Arc::new(RwLock::new(Store::default()));
        Self {
            units: MemResourceUnitRepository {
                store: store.clone(),
            },
            bookings: MemBookingRepository {
                store: store.clone(),
            },
            penalties: MemPenaltyRepository {
                store: store.clone(),
            },
            opening_hours: MemOpeningHoursRepository { store },
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn units(&self) -> &dyn ResourceUnitRepository {
        &self.units
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn penalties(&self) -> &dyn PenaltyRepository {
        &self.penalties
    }

    fn opening_hours(&self) -> &dyn OpeningHoursRepository {
        &self.opening_hours
    }
}

// ── Resource units ──────────────────────────────────────────────

struct MemResourceUnitRepository {
    store: SharedStore,
}

#[async_trait]
impl ResourceUnitRepository for MemResourceUnitRepository {
    async fn save(&self, unit: ResourceUnit) -> DomainResult<()> {
        let mut store = self.store.write().map_err(|_| lock_poisoned())?;
        store.units.insert(unit.id, unit);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<ResourceUnit>> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        Ok(store.units.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<ResourceUnit>> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        Ok(ids
            .iter()
            .filter_map(|id| store.units.get(id).cloned())
            .collect())
    }

    async fn list(
        &self,
        kind: ResourceKind,
        filter: UnitFilter,
    ) -> DomainResult<Vec<ResourceUnit>> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        let mut units: Vec<ResourceUnit> = store
            .units
            .values()
            .filter(|u| u.kind == kind)
            .filter(|u| filter.status.map_or(true, |s| u.status == s))
            .filter(|u| filter.parent_id.map_or(true, |p| u.parent_id == Some(p)))
            .filter(|u| filter.include_retired || !u.is_retired())
            .cloned()
            .collect();
        units.sort_by(|a, b| a.location.room_code.cmp(&b.location.room_code));
        Ok(units)
    }

    async fn set_status(&self, id: Uuid, status: UnitStatus) -> DomainResult<()> {
        let mut store = self.store.write().map_err(|_| lock_poisoned())?;
        let unit = store
            .units
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("ResourceUnit", "id", id))?;
        unit.status = status;
        Ok(())
    }

    async fn retire(&self, id: Uuid) -> DomainResult<()> {
        let mut store = self.store.write().map_err(|_| lock_poisoned())?;
        let unit = store
            .units
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("ResourceUnit", "id", id))?;
        unit.retire();
        Ok(())
    }
}

// ── Bookings ────────────────────────────────────────────────────

struct MemBookingRepository {
    store: SharedStore,
}

#[async_trait]
impl BookingRepository for MemBookingRepository {
    async fn claim_group(&self, bookings: Vec<Booking>) -> DomainResult<Vec<Booking>> {
        if bookings.is_empty() {
            return Ok(bookings);
        }
        // Write lock held across re-check and insert: no interleaving claim
        let mut store = self.store.write().map_err(|_| lock_poisoned())?;

        let mut losing: Vec<Uuid> = Vec::new();
        for b in &bookings {
            let taken = store.bookings.values().any(|existing| {
                existing.resource_unit_id == b.resource_unit_id
                    && existing.status.is_holding()
                    && existing.overlaps(b.start_ts, b.end_ts)
            });
            if taken {
                losing.push(b.resource_unit_id);
            }
        }
        if !losing.is_empty() {
            return Err(DomainError::Conflict { unit_ids: losing });
        }

        for b in &bookings {
            store.bookings.insert(b.id, b.clone());
        }
        Ok(bookings)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        Ok(store.bookings.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> DomainResult<Option<Booking>> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        Ok(store
            .bookings
            .values()
            .find(|b| b.attendance_code == code)
            .cloned())
    }

    async fn find_conflicting_units(
        &self,
        unit_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Uuid>> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        Ok(unit_ids
            .iter()
            .filter(|id| {
                store.bookings.values().any(|b| {
                    b.resource_unit_id == **id && b.status.is_holding() && b.overlaps(start, end)
                })
            })
            .copied()
            .collect())
    }

    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Booking>> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        let mut bookings: Vec<Booking> = store
            .bookings
            .values()
            .filter(|b| b.booked_by == user_id || b.booked_for == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.start_ts.cmp(&a.start_ts));
        Ok(bookings)
    }

    async fn set_status_guarded(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> DomainResult<bool> {
        if !from.can_transition_to(to) {
            return Err(DomainError::WrongState {
                entity: "Booking",
                current: from.to_string(),
                attempted: to.as_str(),
            });
        }
        let mut store = self.store.write().map_err(|_| lock_poisoned())?;
        match store.bookings.get_mut(&id) {
            Some(b) if b.status == from => {
                b.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_missed_checkins(&self, cutoff: DateTime<Utc>) -> DomainResult<Vec<Booking>> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        Ok(store
            .bookings
            .values()
            .filter(|b| b.status == BookingStatus::Confirmed && b.start_ts < cutoff)
            .cloned()
            .collect())
    }

    async fn find_finished_arrivals(&self, now: DateTime<Utc>) -> DomainResult<Vec<Booking>> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        Ok(store
            .bookings
            .values()
            .filter(|b| b.status == BookingStatus::Arrived && b.end_ts < now)
            .cloned()
            .collect())
    }
}

// ── Penalties ───────────────────────────────────────────────────

struct MemPenaltyRepository {
    store: SharedStore,
}

#[async_trait]
impl PenaltyRepository for MemPenaltyRepository {
    async fn save(&self, penalty: Penalty) -> DomainResult<()> {
        let mut store = self.store.write().map_err(|_| lock_poisoned())?;
        store.penalties.insert(penalty.id, penalty);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Penalty>> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        Ok(store.penalties.get(&id).cloned())
    }

    async fn exists_for_booking(&self, booking_id: Uuid) -> DomainResult<bool> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        Ok(store
            .penalties
            .values()
            .any(|p| p.booking_id == booking_id))
    }

    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Penalty>> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        let mut penalties: Vec<Penalty> = store
            .penalties
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        penalties.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(penalties)
    }

    async fn settle_guarded(&self, id: Uuid, to: PenaltyStatus) -> DomainResult<bool> {
        let mut store = self.store.write().map_err(|_| lock_poisoned())?;
        match store.penalties.get_mut(&id) {
            Some(p) if p.status == PenaltyStatus::Pending => {
                p.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// ── Opening hours ───────────────────────────────────────────────

struct MemOpeningHoursRepository {
    store: SharedStore,
}

#[async_trait]
impl OpeningHoursRepository for MemOpeningHoursRepository {
    async fn save(&self, rule: OpeningHoursRule) -> DomainResult<()> {
        let mut store = self.store.write().map_err(|_| lock_poisoned())?;
        store.rules.push(rule);
        Ok(())
    }

    async fn find_for_kind(&self, kind: ResourceKind) -> DomainResult<Vec<OpeningHoursRule>> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        Ok(store
            .rules
            .iter()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect())
    }

    async fn find_for_day(
        &self,
        kind: ResourceKind,
        resource_id: Option<Uuid>,
        day_of_week: u8,
    ) -> DomainResult<Vec<OpeningHoursRule>> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        Ok(store
            .rules
            .iter()
            .filter(|r| r.kind == kind && r.day_of_week == day_of_week)
            .filter(|r| r.resource_id.is_none() || r.resource_id == resource_id)
            .cloned()
            .collect())
    }

    async fn has_rules_for_kind(&self, kind: ResourceKind) -> DomainResult<bool> {
        let store = self.store.read().map_err(|_| lock_poisoned())?;
        Ok(store.rules.iter().any(|r| r.kind == kind))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::domain::resource::{Location, ResourceDetails};

    fn ts(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 20, h, 0, 0).unwrap()
    }

    fn booking_for(unit: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> Booking {
        Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            unit,
            start,
            end,
            vec![],
            None,
        )
    }

    #[tokio::test]
    async fn claim_rejects_overlap_and_keeps_nothing() {
        let repos = InMemoryRepositoryProvider::new();
        let unit_a = Uuid::new_v4();
        let unit_b = Uuid::new_v4();

        repos
            .bookings()
            .claim_group(vec![booking_for(unit_a, ts(9), ts(11))])
            .await
            .unwrap();

        let err = repos
            .bookings()
            .claim_group(vec![
                booking_for(unit_b, ts(9), ts(10)),
                booking_for(unit_a, ts(10), ts(12)),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { unit_ids } if unit_ids == vec![unit_a]));

        // The non-conflicting sibling must not have been committed
        let conflicts = repos
            .bookings()
            .find_conflicting_units(&[unit_b], ts(9), ts(10))
            .await
            .unwrap();
        assert!(conflicts.is_empty());
    }

    #[tokio::test]
    async fn guarded_transition_fails_on_stale_status() {
        let repos = InMemoryRepositoryProvider::new();
        let unit = Uuid::new_v4();
        let booking = repos
            .bookings()
            .claim_group(vec![booking_for(unit, ts(9), ts(10))])
            .await
            .unwrap()
            .remove(0);

        assert!(repos
            .bookings()
            .set_status_guarded(booking.id, BookingStatus::Confirmed, BookingStatus::Arrived)
            .await
            .unwrap());
        // Stale expectation loses
        assert!(!repos
            .bookings()
            .set_status_guarded(booking.id, BookingStatus::Confirmed, BookingStatus::NoShow)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn illegal_transition_is_rejected_outright() {
        let repos = InMemoryRepositoryProvider::new();
        let err = repos
            .bookings()
            .set_status_guarded(
                Uuid::new_v4(),
                BookingStatus::Completed,
                BookingStatus::Confirmed,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::WrongState { .. }));
    }

    #[tokio::test]
    async fn list_for_user_is_start_descending() {
        let repos = InMemoryRepositoryProvider::new();
        let user = Uuid::new_v4();

        for (start, end) in [(ts(9), ts(10)), (ts(14), ts(15)), (ts(11), ts(12))] {
            let mut b = booking_for(Uuid::new_v4(), start, end);
            b.booked_by = user;
            b.booked_for = user;
            repos.bookings().claim_group(vec![b]).await.unwrap();
        }

        let list = repos.bookings().list_for_user(user).await.unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.windows(2).all(|w| w[0].start_ts >= w[1].start_ts));
    }

    #[tokio::test]
    async fn unit_filter_respects_retired_flag() {
        let repos = InMemoryRepositoryProvider::new();
        let mut unit = ResourceUnit::new(
            ResourceKind::Room,
            None,
            Location {
                building: "Science".into(),
                room_code: "SCI-101".into(),
                floor: 1,
            },
            ResourceDetails::Room {
                capacity: 30,
                purpose: "lecture".into(),
            },
        );
        let id = unit.id;
        unit.retire();
        repos.units().save(unit).await.unwrap();

        let visible = repos
            .units()
            .list(ResourceKind::Room, UnitFilter::default())
            .await
            .unwrap();
        assert!(visible.is_empty());

        let all = repos
            .units()
            .list(
                ResourceKind::Room,
                UnitFilter {
                    include_retired: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
    }
}
