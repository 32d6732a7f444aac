use async_trait::async_trait;
use edudesk_core::ErrorInfo;
use edudesk_db::{PgUnitOfWork, UnitOfWork, map_sqlx_error};
use sqlx::PgPool;

use super::model::Settings;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self) -> Result<Settings, ErrorInfo>;

    /// Overwrites the settings row and returns it with a fresh `updated_at`.
    async fn update(&self, settings: &Settings) -> Result<Settings, ErrorInfo>;
}

const SETTINGS_COLUMNS: &str = "organization_name, currency, timezone, week_starts_on, updated_at";

#[derive(Clone)]
pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    async fn get(&self) -> Result<Settings, ErrorInfo> {
        let sql = format!("SELECT {SETTINGS_COLUMNS} FROM settings WHERE id = 1");
        sqlx::query_as::<_, Settings>(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(&self, settings: &Settings) -> Result<Settings, ErrorInfo> {
        let sql = format!(
            "UPDATE settings SET organization_name = $1, currency = $2, timezone = $3, \
             week_starts_on = $4, updated_at = NOW() WHERE id = 1 RETURNING {SETTINGS_COLUMNS}"
        );

        let mut uow = PgUnitOfWork::begin(&self.pool).await?;
        let updated = sqlx::query_as::<_, Settings>(&sql)
            .bind(&settings.organization_name)
            .bind(&settings.currency)
            .bind(&settings.timezone)
            .bind(settings.week_starts_on)
            .fetch_one(uow.conn())
            .await
            .map_err(map_sqlx_error)?;
        uow.track(1);
        uow.save_changes().await?;

        Ok(updated)
    }
}
