//! # Campus Resource Booking Engine
//!
//! Scheduler and availability engine for campus bookable resources
//! (library seats, lab equipment units, rooms).
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, policy rules and repository traits
//! - **application**: Booking services (catalog, availability, scheduler,
//!   attendance) and background sweeps
//! - **infrastructure**: Storage backends (SeaORM database, in-memory)
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Shutdown coordination and campus-time helpers

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::database::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
