//! Access token claims.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Claims embedded in an access token.
///
/// Role and permissions travel inside the token so that authorization needs
/// no database lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    /// Role name, e.g. `admin`
    pub role: String,
    /// Permission names granted by the role
    pub permissions: Vec<String>,
    /// Issuer; must match the configured issuer
    pub iss: String,
    /// Expiration timestamp (Unix seconds)
    pub exp: usize,
    /// Issued-at timestamp (Unix seconds)
    pub iat: usize,
}

impl Claims {
    /// The subject as a UUID, if it is one.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// Whether the token grants `permission`.
    ///
    /// A `<resource>:write` grant implies `<resource>:read`.
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.permissions.iter().any(|p| p == permission) {
            return true;
        }
        match permission.strip_suffix(":read") {
            Some(resource) => {
                let write = format!("{resource}:write");
                self.permissions.iter().any(|p| *p == write)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(permissions: &[&str]) -> Claims {
        Claims {
            sub: Uuid::nil().to_string(),
            email: "staff@edudesk.io".to_string(),
            role: "staff".to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            iss: "edudesk".to_string(),
            exp: 1_900_000_000,
            iat: 1_800_000_000,
        }
    }

    #[test]
    fn test_claims_serialize() {
        let serialized = serde_json::to_string(&claims(&["students:write"])).unwrap();
        assert!(serialized.contains(r#""role":"staff""#));
        assert!(serialized.contains(r#""iss":"edudesk""#));
    }

    #[test]
    fn test_user_id_parses_subject() {
        assert_eq!(claims(&[]).user_id(), Some(Uuid::nil()));

        let mut bad = claims(&[]);
        bad.sub = "not-a-uuid".to_string();
        assert_eq!(bad.user_id(), None);
    }

    #[test]
    fn test_write_implies_read() {
        let c = claims(&["students:write", "dashboard:read"]);
        assert!(c.has_permission("students:write"));
        assert!(c.has_permission("students:read"));
        assert!(c.has_permission("dashboard:read"));
        assert!(!c.has_permission("plans:read"));
        assert!(!c.has_permission("dashboard:write"));
    }
}
