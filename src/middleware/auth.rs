use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use edudesk_auth::{Claims, bearer_token, verify_token};
use edudesk_core::error_info::{AuthError, UserError};
use edudesk_core::{AppError, ErrorInfo};
use edudesk_models::UserId;

use crate::state::AppState;

/// Extractor that validates the bearer token and exposes its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.0.has_permission(permission)
    }

    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .user_id()
            .map(UserId::from_uuid)
            .ok_or_else(|| ErrorInfo::auth(AuthError::InvalidToken).into())
    }

    pub fn role(&self) -> &str {
        &self.0.role
    }

    /// Fails with `Error_User_PermissionDenied` unless the token grants
    /// `permission`.
    pub fn require(&self, permission: &str) -> Result<(), AppError> {
        if self.has_permission(permission) {
            return Ok(());
        }
        Err(ErrorInfo::user(UserError::PermissionDenied)
            .with_message(format!("Missing required permission: {permission}"))
            .into())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let token = bearer_token(header)?;
        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Declares an extractor that authenticates the caller and requires one
/// permission.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $permission:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = edudesk_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;
                auth_user.require($permission)?;
                Ok($name(auth_user))
            }
        }
    };
}

require_permission!(RequireStudentsRead, "students:read");
require_permission!(RequireStudentsWrite, "students:write");

require_permission!(RequirePlansRead, "plans:read");
require_permission!(RequirePlansWrite, "plans:write");

require_permission!(RequireSessionsRead, "sessions:read");
require_permission!(RequireSessionsWrite, "sessions:write");

require_permission!(RequireAttendanceRead, "attendance:read");
require_permission!(RequireAttendanceWrite, "attendance:write");

require_permission!(RequirePaymentsRead, "payments:read");
require_permission!(RequirePaymentsWrite, "payments:write");

require_permission!(RequireRegionsRead, "regions:read");
require_permission!(RequireRegionsWrite, "regions:write");

require_permission!(RequireSettingsRead, "settings:read");
require_permission!(RequireSettingsWrite, "settings:write");

require_permission!(RequireUsersWrite, "users:write");

require_permission!(RequireDashboardRead, "dashboard:read");

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use edudesk_models::Role;
    use uuid::Uuid;

    fn auth_user(role: Role) -> AuthUser {
        AuthUser(Claims {
            sub: Uuid::new_v4().to_string(),
            email: "test@edudesk.io".to_string(),
            role: role.as_str().to_string(),
            permissions: role.permissions(),
            iss: "edudesk".to_string(),
            exp: 9_999_999_999,
            iat: 1_234_567_890,
        })
    }

    #[test]
    fn test_teacher_cannot_write_payments() {
        let teacher = auth_user(Role::Teacher);
        assert!(teacher.has_permission("payments:read"));
        let err = teacher.require("payments:write").unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.code, Some(UserError::PermissionDenied.into()));
    }

    #[test]
    fn test_admin_passes_every_check() {
        let admin = auth_user(Role::Admin);
        assert!(admin.require("settings:write").is_ok());
        assert!(admin.require("dashboard:read").is_ok());
    }

    #[test]
    fn test_user_id_from_subject() {
        let mut user = auth_user(Role::Staff);
        assert!(user.user_id().is_ok());

        user.0.sub = "garbage".to_string();
        let err = user.user_id().unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
