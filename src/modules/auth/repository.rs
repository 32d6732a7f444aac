//! Account persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use edudesk_core::ErrorInfo;
use edudesk_db::{PgUnitOfWork, UnitOfWork, execute_in_unit, map_sqlx_error};
use edudesk_models::UserId;
use sqlx::PgPool;

use super::model::{NewUser, UserAccount};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, ErrorInfo>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, ErrorInfo>;

    async fn insert(&self, user: NewUser) -> Result<UserAccount, ErrorInfo>;

    /// Bumps the failure counter in one atomic step and returns the new
    /// state. A lock that expired by `now` restarts the count at one; the
    /// count reaching `max_attempts` locks the account until `lock_until`.
    /// `None` when the account no longer exists.
    async fn record_failed_login(
        &self,
        id: UserId,
        max_attempts: i32,
        lock_until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<FailedLogin>, ErrorInfo>;

    async fn reset_failed_logins(&self, id: UserId) -> Result<u64, ErrorInfo>;

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<u64, ErrorInfo>;
}

/// Counter and lock as stored after a failed login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct FailedLogin {
    pub failed_login_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, role, is_active, \
                            failed_login_attempts, locked_until, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, ErrorInfo> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, UserAccount>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, ErrorInfo> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserAccount>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn insert(&self, user: NewUser) -> Result<UserAccount, ErrorInfo> {
        let sql = format!(
            "INSERT INTO users (id, first_name, last_name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
        );

        let mut uow = PgUnitOfWork::begin(&self.pool).await?;
        let account = sqlx::query_as::<_, UserAccount>(&sql)
            .bind(UserId::new())
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(uow.conn())
            .await
            .map_err(map_sqlx_error)?;
        uow.track(1);
        uow.save_changes().await?;

        Ok(account)
    }

    async fn record_failed_login(
        &self,
        id: UserId,
        max_attempts: i32,
        lock_until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<FailedLogin>, ErrorInfo> {
        // The new count is read from the row under its update lock.
        const BUMPED: &str = "CASE WHEN locked_until <= $4 THEN 1 ELSE failed_login_attempts + 1 END";
        let sql = format!(
            "UPDATE users SET failed_login_attempts = {BUMPED}, \
             locked_until = CASE WHEN {BUMPED} >= $2 THEN $3 ELSE NULL END, \
             updated_at = NOW() \
             WHERE id = $1 RETURNING failed_login_attempts, locked_until"
        );

        let mut uow = PgUnitOfWork::begin(&self.pool).await?;
        let failure = sqlx::query_as::<_, FailedLogin>(&sql)
            .bind(id)
            .bind(max_attempts)
            .bind(lock_until)
            .bind(now)
            .fetch_optional(uow.conn())
            .await
            .map_err(map_sqlx_error)?;
        if failure.is_some() {
            uow.track(1);
        }
        uow.save_changes().await?;

        Ok(failure)
    }

    async fn reset_failed_logins(&self, id: UserId) -> Result<u64, ErrorInfo> {
        execute_in_unit(
            &self.pool,
            sqlx::query(
                "UPDATE users SET failed_login_attempts = 0, locked_until = NULL, updated_at = NOW() \
                 WHERE id = $1",
            )
            .bind(id),
        )
        .await
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<u64, ErrorInfo> {
        execute_in_unit(
            &self.pool,
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash),
        )
        .await
    }
}
