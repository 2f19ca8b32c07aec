pub mod booking_repository;
pub mod opening_hours_repository;
pub mod penalty_repository;
pub mod repository_provider;
pub mod resource_unit_repository;

pub use booking_repository::SeaOrmBookingRepository;
pub use opening_hours_repository::SeaOrmOpeningHoursRepository;
pub use penalty_repository::SeaOrmPenaltyRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use resource_unit_repository::SeaOrmResourceUnitRepository;

use crate::domain::DomainError;

/// Shared DbErr mapping: storage failures surface as Transient so callers
/// can distinguish "retry" from "request is invalid".
pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Transient(format!("Database error: {}", e))
}
