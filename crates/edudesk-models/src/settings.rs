//! Organisation-wide settings. There is exactly one settings row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Settings {
    pub organization_name: String,
    /// ISO 4217 code
    pub currency: String,
    /// IANA zone name
    pub timezone: String,
    /// ISO weekday number, 1 (Monday) to 7 (Sunday)
    pub week_starts_on: i16,
    pub updated_at: DateTime<Utc>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            organization_name: "EduDesk".to_string(),
            currency: "USD".to_string(),
            timezone: "UTC".to_string(),
            week_starts_on: 1,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingsDto {
    #[validate(length(min = 1, max = 200))]
    pub organization_name: Option<String>,
    #[validate(length(equal = 3))]
    #[schema(example = "EUR")]
    pub currency: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub timezone: Option<String>,
    #[validate(range(min = 1, max = 7))]
    pub week_starts_on: Option<i16>,
}

impl UpdateSettingsDto {
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(name) = &self.organization_name {
            settings.organization_name = name.clone();
        }
        if let Some(currency) = &self.currency {
            settings.currency = currency.to_uppercase();
        }
        if let Some(timezone) = &self.timezone {
            settings.timezone = timezone.clone();
        }
        if let Some(day) = self.week_starts_on {
            settings.week_starts_on = day;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.organization_name.is_none()
            && self.currency.is_none()
            && self.timezone.is_none()
            && self.week_starts_on.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_start_range() {
        let dto = UpdateSettingsDto {
            week_starts_on: Some(8),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_apply_uppercases_currency() {
        let mut settings = Settings::default();
        let dto = UpdateSettingsDto {
            currency: Some("eur".to_string()),
            ..Default::default()
        };
        assert!(!dto.is_empty());
        dto.apply_to(&mut settings);
        assert_eq!(settings.currency, "EUR");
        assert_eq!(settings.organization_name, "EduDesk");
    }
}
