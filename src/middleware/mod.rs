//! Request extractors and middleware.
//!
//! - [`auth`]: bearer token authentication and permission extractors
//! - [`cancellation`]: the per-request cancellation boundary
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::RequireStudentsWrite;
//!
//! async fn create_student(
//!     RequireStudentsWrite(_user): RequireStudentsWrite,
//!     cancel: CancelSignal,
//! ) -> Result<Json<Student>, AppError> {
//!     // Only runs when the token grants `students:write`
//! }
//! ```

pub mod auth;
pub mod cancellation;
