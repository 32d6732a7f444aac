//! # EduDesk Auth
//!
//! Access token handling for the EduDesk API.
//!
//! - [`claims`]: the claims carried by an access token
//! - [`jwt`]: issuing, verifying and extracting bearer tokens
//!
//! Every failure is an [`edudesk_core::ErrorInfo`] with an `Error_Auth_*`
//! code, so the HTTP layer maps it like any other failed outcome.
//!
//! # Example
//!
//! ```ignore
//! use edudesk_auth::{create_access_token, verify_token};
//! use edudesk_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "admin@edudesk.io", "admin", permissions, &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{bearer_token, create_access_token, verify_token};
