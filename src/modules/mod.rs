pub mod attendance;
pub mod auth;
pub mod calendar;
pub mod dashboard;
pub mod payments;
pub mod plans;
pub mod regions;
pub mod sessions;
pub mod settings;
pub mod students;
