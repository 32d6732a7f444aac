//! Scheduled class sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{PlanId, SessionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClassSession {
    pub id: SessionId,
    pub plan_id: PlanId,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ClassSession {
    /// Whether the session starts inside the half-open range `[from, to)`.
    pub fn starts_within(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.starts_at >= from && self.starts_at < to
    }
}

/// `ends_at` must be after `starts_at`; the service enforces it.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSessionDto {
    pub plan_id: PlanId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
}

impl CreateSessionDto {
    pub fn has_valid_range(&self) -> bool {
        self.ends_at > self.starts_at
    }
}
