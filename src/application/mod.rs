pub mod services;

pub use services::{
    AttendanceService, AvailabilityService, CatalogService, OpeningHoursService, SchedulerService,
};
