pub mod model;
pub mod repository;

pub use model::{Location, ResourceDetails, ResourceKind, ResourceUnit, UnitStatus};
pub use repository::{ResourceUnitRepository, UnitFilter};
