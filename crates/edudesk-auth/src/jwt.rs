//! Issuing and verifying access tokens.
//!
//! Tokens are HS256 JWTs signed with [`JwtConfig::secret`] and stamped with
//! [`JwtConfig::issuer`]. Verification rejects tokens from another issuer.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use edudesk_config::JwtConfig;
use edudesk_core::ErrorInfo;
use edudesk_core::error_info::AuthError;

use crate::claims::Claims;

/// Creates an access token for `user_id` carrying its role and permissions.
///
/// # Errors
///
/// `Error_Auth_TokenIssueFailed` if encoding fails.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    role: &str,
    permissions: Vec<String>,
    jwt_config: &JwtConfig,
) -> Result<String, ErrorInfo> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        permissions,
        iss: jwt_config.issuer.clone(),
        exp,
        iat: now,
    };

    encode_claims(&claims, jwt_config)
}

fn encode_claims(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, ErrorInfo> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| {
        ErrorInfo::auth(AuthError::TokenIssueFailed)
            .with_message(format!("Failed to create token: {e}"))
    })
}

/// Verifies signature, expiry and issuer, and returns the claims.
///
/// # Errors
///
/// `Error_Auth_ExpiredToken` for an expired token, `Error_Auth_InvalidToken`
/// for anything else.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, ErrorInfo> {
    let mut validation = Validation::default();
    validation.set_issuer(&[jwt_config.issuer.as_str()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => ErrorInfo::auth(AuthError::ExpiredToken),
        _ => ErrorInfo::auth(AuthError::InvalidToken),
    })
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, ErrorInfo> {
    let header = header.ok_or_else(|| ErrorInfo::auth(AuthError::MissingToken))?;
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ErrorInfo::auth(AuthError::InvalidToken))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            issuer: "edudesk-test".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[test]
    fn test_verify_token_success() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let token = create_access_token(
            user_id,
            "teacher@edudesk.io",
            "teacher",
            vec!["attendance:write".to_string()],
            &config,
        )
        .unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.user_id(), Some(user_id));
        assert_eq!(claims.email, "teacher@edudesk.io");
        assert_eq!(claims.role, "teacher");
        assert_eq!(claims.iss, "edudesk-test");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_verify_token_invalid() {
        let err = verify_token("invalid-token", &get_test_jwt_config()).unwrap_err();
        assert!(err.is(AuthError::InvalidToken));
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let token =
            create_access_token(Uuid::new_v4(), "a@edudesk.io", "staff", vec![], &config).unwrap();

        let wrong = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            ..config
        };
        assert!(verify_token(&token, &wrong).unwrap_err().is(AuthError::InvalidToken));
    }

    #[test]
    fn test_verify_token_wrong_issuer() {
        let config = get_test_jwt_config();
        let token =
            create_access_token(Uuid::new_v4(), "a@edudesk.io", "staff", vec![], &config).unwrap();

        let other = JwtConfig {
            issuer: "someone-else".to_string(),
            ..config
        };
        assert!(verify_token(&token, &other).unwrap_err().is(AuthError::InvalidToken));
    }

    #[test]
    fn test_verify_token_expired() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "old@edudesk.io".to_string(),
            role: "staff".to_string(),
            permissions: vec![],
            iss: config.issuer.clone(),
            exp: now - 7200,
            iat: now - 10800,
        };
        let token = encode_claims(&claims, &config).unwrap();

        assert!(verify_token(&token, &config).unwrap_err().is(AuthError::ExpiredToken));
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Ok("abc.def"));
        assert!(bearer_token(None).unwrap_err().is(AuthError::MissingToken));
        assert!(bearer_token(Some("Basic xyz")).unwrap_err().is(AuthError::InvalidToken));
        assert!(bearer_token(Some("Bearer ")).unwrap_err().is(AuthError::InvalidToken));
    }
}
