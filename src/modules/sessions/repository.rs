use async_trait::async_trait;
use chrono::{DateTime, Utc};
use edudesk_core::ErrorInfo;
use edudesk_db::{PgUnitOfWork, UnitOfWork, execute_in_unit, map_sqlx_error};
use edudesk_models::SessionId;
use sqlx::PgPool;

use super::model::{ClassSession, CreateSessionDto};

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, dto: &CreateSessionDto) -> Result<ClassSession, ErrorInfo>;

    async fn find(&self, id: SessionId) -> Result<Option<ClassSession>, ErrorInfo>;

    /// Sessions starting in `[from, to)`, earliest first.
    async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ClassSession>, ErrorInfo>;

    async fn delete(&self, id: SessionId) -> Result<u64, ErrorInfo>;

    /// Number of sessions starting in `[from, to)`.
    async fn count_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<i64, ErrorInfo>;
}

const SESSION_COLUMNS: &str = "id, plan_id, title, starts_at, ends_at, location, created_at";

#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn insert(&self, dto: &CreateSessionDto) -> Result<ClassSession, ErrorInfo> {
        let sql = format!(
            "INSERT INTO class_sessions (id, plan_id, title, starts_at, ends_at, location) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {SESSION_COLUMNS}"
        );

        let mut uow = PgUnitOfWork::begin(&self.pool).await?;
        let session = sqlx::query_as::<_, ClassSession>(&sql)
            .bind(SessionId::new())
            .bind(dto.plan_id)
            .bind(&dto.title)
            .bind(dto.starts_at)
            .bind(dto.ends_at)
            .bind(&dto.location)
            .fetch_one(uow.conn())
            .await
            .map_err(map_sqlx_error)?;
        uow.track(1);
        uow.save_changes().await?;

        Ok(session)
    }

    async fn find(&self, id: SessionId) -> Result<Option<ClassSession>, ErrorInfo> {
        let sql = format!("SELECT {SESSION_COLUMNS} FROM class_sessions WHERE id = $1");
        sqlx::query_as::<_, ClassSession>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ClassSession>, ErrorInfo> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM class_sessions \
             WHERE starts_at >= $1 AND starts_at < $2 ORDER BY starts_at, id"
        );
        sqlx::query_as::<_, ClassSession>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn delete(&self, id: SessionId) -> Result<u64, ErrorInfo> {
        execute_in_unit(
            &self.pool,
            sqlx::query("DELETE FROM class_sessions WHERE id = $1").bind(id),
        )
        .await
    }

    async fn count_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<i64, ErrorInfo> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM class_sessions WHERE starts_at >= $1 AND starts_at < $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }
}
