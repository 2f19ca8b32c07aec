pub mod model;
pub mod repository;

pub use model::OpeningHoursRule;
pub use repository::OpeningHoursRepository;
