use async_trait::async_trait;
use edudesk_core::ErrorInfo;
use edudesk_db::{PgUnitOfWork, UnitOfWork, execute_in_unit, map_sqlx_error};
use edudesk_models::PlanId;
use sqlx::PgPool;

use super::model::{CreatePlanDto, Plan};

#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn insert(&self, dto: &CreatePlanDto) -> Result<Plan, ErrorInfo>;

    /// One page of plans ordered by name, plus the total count.
    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Plan>, i64), ErrorInfo>;

    async fn find(&self, id: PlanId) -> Result<Option<Plan>, ErrorInfo>;

    /// Writes `plan` only if the stored version still equals
    /// `expected_version`, bumping the version. `None` when the guard fails.
    async fn update(&self, plan: &Plan, expected_version: i32) -> Result<Option<Plan>, ErrorInfo>;

    async fn delete(&self, id: PlanId) -> Result<u64, ErrorInfo>;

    async fn count_active(&self) -> Result<i64, ErrorInfo>;
}

const PLAN_COLUMNS: &str = "id, name, description, price_cents, sessions_per_week, \
                            duration_weeks, is_active, version, created_at, updated_at";

#[derive(Clone)]
pub struct PgPlanRepository {
    pool: PgPool,
}

impl PgPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanRepository for PgPlanRepository {
    async fn insert(&self, dto: &CreatePlanDto) -> Result<Plan, ErrorInfo> {
        let sql = format!(
            "INSERT INTO plans (id, name, description, price_cents, sessions_per_week, duration_weeks) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PLAN_COLUMNS}"
        );

        let mut uow = PgUnitOfWork::begin(&self.pool).await?;
        let plan = sqlx::query_as::<_, Plan>(&sql)
            .bind(PlanId::new())
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(dto.price_cents)
            .bind(dto.sessions_per_week)
            .bind(dto.duration_weeks)
            .fetch_one(uow.conn())
            .await
            .map_err(map_sqlx_error)?;
        uow.track(1);
        uow.save_changes().await?;

        Ok(plan)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Plan>, i64), ErrorInfo> {
        let sql = format!("SELECT {PLAN_COLUMNS} FROM plans ORDER BY name, id LIMIT $1 OFFSET $2");
        let plans = sqlx::query_as::<_, Plan>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plans")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok((plans, total))
    }

    async fn find(&self, id: PlanId) -> Result<Option<Plan>, ErrorInfo> {
        let sql = format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1");
        sqlx::query_as::<_, Plan>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(&self, plan: &Plan, expected_version: i32) -> Result<Option<Plan>, ErrorInfo> {
        let sql = format!(
            "UPDATE plans SET name = $3, description = $4, price_cents = $5, \
             sessions_per_week = $6, duration_weeks = $7, is_active = $8, \
             version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND version = $2 RETURNING {PLAN_COLUMNS}"
        );

        let mut uow = PgUnitOfWork::begin(&self.pool).await?;
        let updated = sqlx::query_as::<_, Plan>(&sql)
            .bind(plan.id)
            .bind(expected_version)
            .bind(&plan.name)
            .bind(&plan.description)
            .bind(plan.price_cents)
            .bind(plan.sessions_per_week)
            .bind(plan.duration_weeks)
            .bind(plan.is_active)
            .fetch_optional(uow.conn())
            .await
            .map_err(map_sqlx_error)?;
        uow.track(u64::from(updated.is_some()));
        uow.save_changes().await?;

        Ok(updated)
    }

    async fn delete(&self, id: PlanId) -> Result<u64, ErrorInfo> {
        execute_in_unit(
            &self.pool,
            sqlx::query("DELETE FROM plans WHERE id = $1").bind(id),
        )
        .await
    }

    async fn count_active(&self) -> Result<i64, ErrorInfo> {
        sqlx::query_scalar("SELECT COUNT(*) FROM plans WHERE is_active")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}
