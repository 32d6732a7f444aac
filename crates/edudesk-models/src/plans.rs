//! Tuition plans.
//!
//! Plans carry a `version` that increases on every update. Updates must
//! send the version they were based on; a stale version is rejected as a
//! concurrency conflict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::PlanId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub description: Option<String>,
    /// Price per billing period, in minor currency units
    pub price_cents: i64,
    pub sessions_per_week: i32,
    pub duration_weeks: i32,
    pub is_active: bool,
    /// Optimistic concurrency token
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePlanDto {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: i64,
    #[validate(range(min = 1, max = 14))]
    pub sessions_per_week: i32,
    #[validate(range(min = 1, max = 104))]
    pub duration_weeks: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdatePlanDto {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: Option<i64>,
    #[validate(range(min = 1, max = 14))]
    pub sessions_per_week: Option<i32>,
    #[validate(range(min = 1, max = 104))]
    pub duration_weeks: Option<i32>,
    pub is_active: Option<bool>,
    /// Version the client last read
    pub version: i32,
}

impl UpdatePlanDto {
    /// Applies the provided fields to `plan`. Does not touch `version`.
    pub fn apply_to(&self, plan: &mut Plan) {
        if let Some(name) = &self.name {
            plan.name = name.clone();
        }
        if self.description.is_some() {
            plan.description = self.description.clone();
        }
        if let Some(price_cents) = self.price_cents {
            plan.price_cents = price_cents;
        }
        if let Some(sessions_per_week) = self.sessions_per_week {
            plan.sessions_per_week = sessions_per_week;
        }
        if let Some(duration_weeks) = self.duration_weeks {
            plan.duration_weeks = duration_weeks;
        }
        if let Some(is_active) = self.is_active {
            plan.is_active = is_active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_plan_validation() {
        let dto = CreatePlanDto {
            name: "Intensive".to_string(),
            description: None,
            price_cents: 45_000,
            sessions_per_week: 3,
            duration_weeks: 12,
        };
        assert!(dto.validate().is_ok());

        let dto = CreatePlanDto {
            sessions_per_week: 0,
            price_cents: -1,
            ..dto
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sessions_per_week"));
        assert!(errors.field_errors().contains_key("price_cents"));
    }

    #[test]
    fn test_update_requires_version() {
        let result: Result<UpdatePlanDto, _> = serde_json::from_str(r#"{"name":"New"}"#);
        assert!(result.is_err());

        let dto: UpdatePlanDto = serde_json::from_str(r#"{"name":"New","version":2}"#).unwrap();
        assert_eq!(dto.version, 2);
    }
}
