pub mod booking;
pub mod opening_hours_rule;
pub mod penalty;
pub mod resource_unit;
