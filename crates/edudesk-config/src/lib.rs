//! # EduDesk Config
//!
//! Configuration types for the EduDesk API.
//!
//! Each structure is loaded once from environment variables at startup and
//! then passed explicitly to the operations that need it. Nothing reads the
//! environment after that.
//!
//! - [`server`]: Bind address for the HTTP listener
//! - [`jwt`]: Token signing options
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`validation`]: Input rules that depend on deployment settings
//! - [`lockout`]: Failed-login lockout policy
//!
//! # Example
//!
//! ```ignore
//! use edudesk_config::{JwtConfig, LockoutPolicy, ValidationRules};
//!
//! let jwt_config = JwtConfig::from_env();
//! let rules = ValidationRules::from_env();
//! let lockout = LockoutPolicy::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod lockout;
pub mod server;
pub mod validation;

mod env;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use lockout::LockoutPolicy;
pub use server::ServerConfig;
pub use validation::ValidationRules;
