pub mod model;
pub mod repository;

pub use model::{generate_attendance_code, Booking, BookingRequest, BookingStatus};
pub use repository::BookingRepository;
