//! Regions students are grouped by.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::RegionId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Region {
    pub id: RegionId,
    /// Short unique code, stored upper-case
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRegionDto {
    #[validate(length(min = 1, max = 16))]
    #[schema(example = "NORTH")]
    pub code: String,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

impl CreateRegionDto {
    pub fn normalized_code(&self) -> String {
        self.code.trim().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_normalized() {
        let dto = CreateRegionDto {
            code: " north ".to_string(),
            name: "North".to_string(),
        };
        assert_eq!(dto.normalized_code(), "NORTH");
    }
}
