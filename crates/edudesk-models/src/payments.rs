//! Tuition payments.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{PaymentId, StudentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payment {
    pub id: PaymentId,
    pub student_id: StudentId,
    /// Amount in minor currency units
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RecordPaymentDto {
    pub student_id: StudentId,
    #[validate(range(min = 1))]
    #[schema(example = 15000)]
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
    #[validate(length(max = 120))]
    pub reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_must_be_positive() {
        let dto: RecordPaymentDto = serde_json::from_str(
            r#"{"student_id":"00000000-0000-0000-0000-000000000001","amount_cents":0,"method":"card","paid_on":"2025-06-01"}"#,
        )
        .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("amount_cents"));
    }

    #[test]
    fn test_unknown_method_rejected() {
        let result: Result<RecordPaymentDto, _> = serde_json::from_str(
            r#"{"student_id":"00000000-0000-0000-0000-000000000001","amount_cents":10,"method":"barter","paid_on":"2025-06-01"}"#,
        );
        assert!(result.is_err());
    }
}
