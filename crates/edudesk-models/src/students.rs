//! Student entities and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use edudesk_core::PaginationParams;
use edudesk_core::serde::deserialize_optional_uuid;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::ids::{PlanId, RegionId, StudentId};

/// An enrolled student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub region_id: Option<RegionId>,
    pub plan_id: Option<PlanId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive match on name or email.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.first_name.to_lowercase().contains(&term)
            || self.last_name.to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
    }
}

/// Phone numbers are checked against the configured digit range by the
/// service.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub region_id: Option<RegionId>,
    pub plan_id: Option<PlanId>,
}

/// Only provided fields are changed.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub region_id: Option<RegionId>,
    pub plan_id: Option<PlanId>,
    pub is_active: Option<bool>,
}

impl UpdateStudentDto {
    /// Applies the provided fields to `student`.
    pub fn apply_to(&self, student: &mut Student) {
        if let Some(first_name) = &self.first_name {
            student.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            student.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            student.email = email.clone();
        }
        if self.phone.is_some() {
            student.phone = self.phone.clone();
        }
        if self.date_of_birth.is_some() {
            student.date_of_birth = self.date_of_birth;
        }
        if self.region_id.is_some() {
            student.region_id = self.region_id;
        }
        if self.plan_id.is_some() {
            student.plan_id = self.plan_id;
        }
        if let Some(is_active) = self.is_active {
            student.is_active = is_active;
        }
    }
}

/// Filters for listing students. All filters are optional and combine.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentFilterParams {
    /// Only students of this region
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub region_id: Option<Uuid>,
    /// Case-insensitive match on name or email
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl StudentFilterParams {
    /// The search term, if it is not blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Student {
        let now = Utc::now();
        Student {
            id: StudentId::new(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@school.io".to_string(),
            phone: None,
            date_of_birth: None,
            region_id: None,
            plan_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_create_student_dto_invalid_email() {
        let dto = CreateStudentDto {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "invalid-email".to_string(),
            phone: None,
            date_of_birth: None,
            region_id: None,
            plan_id: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_applies_only_provided_fields() {
        let mut s = student();
        let dto = UpdateStudentDto {
            last_name: Some("Murray".to_string()),
            is_active: Some(false),
            ..Default::default()
        };
        dto.apply_to(&mut s);
        assert_eq!(s.full_name(), "Grace Murray");
        assert_eq!(s.email, "grace@school.io");
        assert!(!s.is_active);
    }

    #[test]
    fn test_matches_search_ignores_case() {
        let s = student();
        assert!(s.matches_search("HOP"));
        assert!(s.matches_search("school.io"));
        assert!(!s.matches_search("turing"));
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let params = StudentFilterParams {
            region_id: None,
            search: Some("   ".to_string()),
            pagination: PaginationParams::default(),
        };
        assert_eq!(params.search_term(), None);
    }
}
