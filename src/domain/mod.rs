pub mod booking;
pub mod error;
pub mod opening_hours;
pub mod penalty;
pub mod policy;
pub mod repositories;
pub mod resource;

// Re-export commonly used types
pub use booking::{Booking, BookingRequest, BookingStatus};
pub use error::{DomainError, DomainResult};
pub use opening_hours::OpeningHoursRule;
pub use penalty::{Penalty, PenaltyStatus};
pub use policy::{BookingPolicy, Role};
pub use repositories::RepositoryProvider;
pub use resource::{ResourceDetails, ResourceKind, ResourceUnit, UnitStatus};
