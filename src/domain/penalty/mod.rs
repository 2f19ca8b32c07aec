pub mod model;
pub mod repository;

pub use model::{Penalty, PenaltyStatus};
pub use repository::PenaltyRepository;
