//! Repository provider: one accessor per aggregate.

use crate::domain::booking::BookingRepository;
use crate::domain::opening_hours::OpeningHoursRepository;
use crate::domain::penalty::PenaltyRepository;
use crate::domain::resource::ResourceUnitRepository;

/// Unified access to all repositories, shared across services as
/// `Arc<dyn RepositoryProvider>`.
pub trait RepositoryProvider: Send + Sync {
    fn units(&self) -> &dyn ResourceUnitRepository;

    fn bookings(&self) -> &dyn BookingRepository;

    fn penalties(&self) -> &dyn PenaltyRepository;

    fn opening_hours(&self) -> &dyn OpeningHoursRepository;
}
