//! Token signing options.

use crate::env::{parse_or, string_or};

/// Options used to sign and verify access tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JwtConfig {
    /// HMAC secret
    pub secret: String,
    /// Value of the `iss` claim; tokens from another issuer are rejected
    pub issuer: String,
    /// Access token lifetime in seconds
    pub access_token_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "your-secret-key-change-in-production".to_string(),
            issuer: "edudesk".to_string(),
            access_token_expiry: 3600, // 1 hour
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: string_or("JWT_SECRET", &defaults.secret),
            issuer: string_or("JWT_ISSUER", &defaults.issuer),
            access_token_expiry: parse_or("JWT_ACCESS_EXPIRY", defaults.access_token_expiry),
        }
    }
}
