use async_trait::async_trait;
use chrono::NaiveDate;
use edudesk_core::ErrorInfo;
use edudesk_db::{PgUnitOfWork, UnitOfWork, map_sqlx_error};
use edudesk_models::{PaymentId, StudentId};
use sqlx::PgPool;

use super::model::{Payment, RecordPaymentDto};

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn insert(&self, dto: &RecordPaymentDto) -> Result<Payment, ErrorInfo>;

    async fn find(&self, id: PaymentId) -> Result<Option<Payment>, ErrorInfo>;

    /// One page of a student's payments, newest first, plus the total count.
    async fn list_for_student(
        &self,
        student_id: StudentId,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Payment>, i64), ErrorInfo>;

    /// Total amount paid on days in `[from, to]`.
    async fn sum_between(&self, from: NaiveDate, to: NaiveDate) -> Result<i64, ErrorInfo>;
}

const PAYMENT_COLUMNS: &str = "id, student_id, amount_cents, method, paid_on, reference, created_at";

#[derive(Clone)]
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn insert(&self, dto: &RecordPaymentDto) -> Result<Payment, ErrorInfo> {
        let sql = format!(
            "INSERT INTO payments (id, student_id, amount_cents, method, paid_on, reference) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PAYMENT_COLUMNS}"
        );

        let mut uow = PgUnitOfWork::begin(&self.pool).await?;
        let payment = sqlx::query_as::<_, Payment>(&sql)
            .bind(PaymentId::new())
            .bind(dto.student_id)
            .bind(dto.amount_cents)
            .bind(dto.method)
            .bind(dto.paid_on)
            .bind(&dto.reference)
            .fetch_one(uow.conn())
            .await
            .map_err(map_sqlx_error)?;
        uow.track(1);
        uow.save_changes().await?;

        Ok(payment)
    }

    async fn find(&self, id: PaymentId) -> Result<Option<Payment>, ErrorInfo> {
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as::<_, Payment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn list_for_student(
        &self,
        student_id: StudentId,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Payment>, i64), ErrorInfo> {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE student_id = $1 \
             ORDER BY paid_on DESC, created_at DESC LIMIT $2 OFFSET $3"
        );
        let payments = sqlx::query_as::<_, Payment>(&sql)
            .bind(student_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE student_id = $1")
            .bind(student_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok((payments, total))
    }

    async fn sum_between(&self, from: NaiveDate, to: NaiveDate) -> Result<i64, ErrorInfo> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM payments \
             WHERE paid_on >= $1 AND paid_on <= $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }
}
