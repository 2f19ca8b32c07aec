pub mod campus_time;
pub mod shutdown;

pub use campus_time::CampusClock;
pub use shutdown::ShutdownSignal;
