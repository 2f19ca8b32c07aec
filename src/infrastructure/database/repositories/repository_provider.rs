//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::opening_hours::OpeningHoursRepository;
use crate::domain::penalty::PenaltyRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::resource::ResourceUnitRepository;

use super::booking_repository::SeaOrmBookingRepository;
use super::opening_hours_repository::SeaOrmOpeningHoursRepository;
use super::penalty_repository::SeaOrmPenaltyRepository;
use super::resource_unit_repository::SeaOrmResourceUnitRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone(), 5_000);
/// let unit = repos.units().find_by_id(unit_id).await?;
/// let mine = repos.bookings().list_for_user(user_id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    units: SeaOrmResourceUnitRepository,
    bookings: SeaOrmBookingRepository,
    penalties: SeaOrmPenaltyRepository,
    opening_hours: SeaOrmOpeningHoursRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection, claim_timeout_ms: u64) -> Self {
        Self {
            units: SeaOrmResourceUnitRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db.clone(), claim_timeout_ms),
            penalties: SeaOrmPenaltyRepository::new(db.clone()),
            opening_hours: SeaOrmOpeningHoursRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
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
