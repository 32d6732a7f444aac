//! Staff accounts and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::UserId;

/// Resource segments that carry `:read` / `:write` permissions.
pub const RESOURCES: &[&str] = &[
    "students",
    "plans",
    "sessions",
    "attendance",
    "payments",
    "regions",
    "settings",
    "users",
];

/// Role of a staff account. Permissions are derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum Role {
    Admin,
    Staff,
    Teacher,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Teacher => "teacher",
        }
    }

    /// Permission names granted by this role.
    ///
    /// - Admin: every resource read and write, plus `dashboard:read`
    /// - Staff: write everything except regions, settings and users
    /// - Teacher: read everything, write sessions and attendance
    pub fn permissions(self) -> Vec<String> {
        let writes: &[&str] = match self {
            Role::Admin => RESOURCES,
            Role::Staff => &["students", "plans", "sessions", "attendance", "payments"],
            Role::Teacher => &["sessions", "attendance"],
        };

        let mut permissions: Vec<String> = RESOURCES
            .iter()
            .map(|resource| {
                if writes.contains(resource) {
                    format!("{resource}:write")
                } else {
                    format!("{resource}:read")
                }
            })
            .collect();
        permissions.push("dashboard:read".to_string());
        permissions
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A staff account as exposed through the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full account row, including credential and lockout state.
///
/// Never serialized; convert to [`User`] before returning it.
#[derive(Debug, Clone, FromRow)]
pub struct UserAccount {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub failed_login_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }
}

impl From<UserAccount> for User {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            role: account.role,
            is_active: account.is_active,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Values needed to insert an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}
