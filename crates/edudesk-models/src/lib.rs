//! # EduDesk Models
//!
//! Domain entities and request/response DTOs for the EduDesk API.
//!
//! Entities derive `sqlx::FromRow` so the PostgreSQL adapters can load them
//! directly; request DTOs derive `validator::Validate` for the shape rules
//! that do not depend on configuration.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed entity IDs
//! - [`users`] and [`auth`]: Accounts, roles and login
//! - [`students`], [`plans`], [`sessions`], [`attendance`], [`payments`]
//! - [`regions`], [`settings`]
//! - [`dashboard`], [`calendar`]: Read models

pub mod attendance;
pub mod auth;
pub mod calendar;
pub mod dashboard;
pub mod ids;
pub mod payments;
pub mod plans;
pub mod regions;
pub mod sessions;
pub mod settings;
pub mod students;
pub mod users;

pub use ids::{AttendanceId, PaymentId, PlanId, RegionId, SessionId, StudentId, UserId};
pub use users::{Role, User, UserAccount};
