use async_trait::async_trait;
use edudesk_core::ErrorInfo;
use edudesk_db::{PgUnitOfWork, UnitOfWork, execute_in_unit, map_sqlx_error};
use edudesk_models::RegionId;
use sqlx::PgPool;

use super::model::Region;

#[async_trait]
pub trait RegionRepository: Send + Sync {
    /// Fails with `ConstraintViolation` if `code` is taken.
    async fn insert(&self, code: &str, name: &str) -> Result<Region, ErrorInfo>;

    /// Every region, ordered by name.
    async fn list(&self) -> Result<Vec<Region>, ErrorInfo>;

    async fn delete(&self, id: RegionId) -> Result<u64, ErrorInfo>;
}

#[derive(Clone)]
pub struct PgRegionRepository {
    pool: PgPool,
}

impl PgRegionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegionRepository for PgRegionRepository {
    async fn insert(&self, code: &str, name: &str) -> Result<Region, ErrorInfo> {
        let mut uow = PgUnitOfWork::begin(&self.pool).await?;
        let region = sqlx::query_as::<_, Region>(
            "INSERT INTO regions (id, code, name) VALUES ($1, $2, $3) \
             RETURNING id, code, name, created_at",
        )
        .bind(RegionId::new())
        .bind(code)
        .bind(name)
        .fetch_one(uow.conn())
        .await
        .map_err(map_sqlx_error)?;
        uow.track(1);
        uow.save_changes().await?;

        Ok(region)
    }

    async fn list(&self) -> Result<Vec<Region>, ErrorInfo> {
        sqlx::query_as::<_, Region>("SELECT id, code, name, created_at FROM regions ORDER BY name, code")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn delete(&self, id: RegionId) -> Result<u64, ErrorInfo> {
        execute_in_unit(
            &self.pool,
            sqlx::query("DELETE FROM regions WHERE id = $1").bind(id),
        )
        .await
    }
}
