//! # EduDesk Core
//!
//! Core types, errors, and utilities for the EduDesk API.
//!
//! The centre of this crate is the outcome pattern every use-case operation
//! returns:
//!
//! - [`outcome`]: [`Outcome`] (success with a value, or failure with an
//!   [`ErrorInfo`]) and [`DataResult`] for collections
//! - [`error_info`]: the closed error taxonomy and its stable string codes
//! - [`cancel`]: [`CancelSignal`], the per-request cancellation token
//!
//! Supporting modules:
//!
//! - [`errors`]: [`AppError`], the HTTP response type failed outcomes turn into
//! - [`calendar`]: ISO-week date helpers
//! - [`pagination`]: Pagination parameters and metadata
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use edudesk_core::{CancelSignal, ErrorInfo, Outcome};
//! use edudesk_core::error_info::UserError;
//!
//! async fn login(req: LoginRequest, cancel: &CancelSignal) -> Outcome<LoginResponse> {
//!     cancel
//!         .run(async move {
//!             let user = repo.find_by_email(&req.email).await?
//!                 .ok_or(UserError::InvalidCredentials)?;
//!             // ...
//!             Ok(response)
//!         })
//!         .await
//! }
//! ```

pub mod calendar;
pub mod cancel;
pub mod error_info;
pub mod errors;
pub mod outcome;
pub mod pagination;
pub mod password;
pub mod serde;

// Re-export commonly used types at crate root
pub use cancel::CancelSignal;
pub use error_info::{ErrorCode, ErrorInfo};
pub use errors::AppError;
pub use outcome::{DataResult, Outcome};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, hash_password_with_cost, verify_password};
