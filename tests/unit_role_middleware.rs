use axum::http::StatusCode;
use edudesk::edudesk_auth::Claims;
use edudesk::edudesk_core::error_info::UserError;
use edudesk::edudesk_models::Role;
use edudesk::middleware::auth::AuthUser;

fn create_test_auth_user(role: Role) -> AuthUser {
    AuthUser(Claims {
        sub: "00000000-0000-0000-0000-000000000000".to_string(),
        email: "test@example.com".to_string(),
        role: role.as_str().to_string(),
        permissions: role.permissions(),
        iss: "edudesk".to_string(),
        exp: 9_999_999_999,
        iat: 1_234_567_890,
    })
}

const WRITES: [&str; 8] = [
    "users:write",
    "students:write",
    "plans:write",
    "sessions:write",
    "attendance:write",
    "payments:write",
    "regions:write",
    "settings:write",
];

fn granted_writes(role: Role) -> Vec<&'static str> {
    let user = create_test_auth_user(role);
    WRITES
        .iter()
        .copied()
        .filter(|permission| user.require(permission).is_ok())
        .collect()
}

#[test]
fn test_admin_writes_everything() {
    assert_eq!(granted_writes(Role::Admin), WRITES);
}

#[test]
fn test_staff_write_scope() {
    assert_eq!(
        granted_writes(Role::Staff),
        [
            "students:write",
            "plans:write",
            "sessions:write",
            "attendance:write",
            "payments:write"
        ]
    );
}

#[test]
fn test_teacher_write_scope() {
    assert_eq!(
        granted_writes(Role::Teacher),
        ["sessions:write", "attendance:write"]
    );
}

#[test]
fn test_every_role_reads_everything() {
    for role in [Role::Admin, Role::Staff, Role::Teacher] {
        let user = create_test_auth_user(role);
        for permission in WRITES {
            let read = permission.replace(":write", ":read");
            assert!(user.require(&read).is_ok(), "{role} should have {read}");
        }
        assert!(user.require("dashboard:read").is_ok());
    }
}

#[test]
fn test_denial_is_permission_denied() {
    let user = create_test_auth_user(Role::Teacher);
    let err = user.require("regions:write").unwrap_err();
    assert_eq!(err.status, StatusCode::FORBIDDEN);
    assert_eq!(err.code, Some(UserError::PermissionDenied.into()));
    assert_eq!(
        err.error.to_string(),
        "Missing required permission: regions:write"
    );
}

#[test]
fn test_unknown_permission_denied() {
    let user = create_test_auth_user(Role::Admin);
    assert!(user.require("billing:write").is_err());
    assert!(user.require("").is_err());
}
