//! Password hashing and verification with bcrypt.
//!
//! Hashing failures are not expected in normal operation; when they happen
//! they surface as `Error_Auth_CredentialHashFailed` so callers can keep
//! returning outcomes instead of panicking.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::error_info::{AuthError, ErrorInfo};

/// Hashes `password` with the default bcrypt cost.
pub fn hash_password(password: &str) -> Result<String, ErrorInfo> {
    hash_password_with_cost(password, DEFAULT_COST)
}

/// Hashes `password` with an explicit bcrypt cost (4..=31).
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, ErrorInfo> {
    hash(password, cost).map_err(|e| {
        tracing::error!(error = %e, "Failed to hash password");
        ErrorInfo::auth(AuthError::CredentialHashFailed)
    })
}

/// Checks `password` against a stored bcrypt hash.
///
/// A malformed stored hash is reported as an error rather than as a
/// mismatch.
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, ErrorInfo> {
    verify(password, hashed).map_err(|e| {
        tracing::error!(error = %e, "Failed to verify password");
        ErrorInfo::auth(AuthError::CredentialHashFailed)
    })
}
