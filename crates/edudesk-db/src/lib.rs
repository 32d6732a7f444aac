//! # EduDesk DB
//!
//! Database pool and persistence plumbing for the EduDesk API.
//!
//! - [`init_db_pool`]: connection pool setup from `DATABASE_URL`
//! - [`unit_of_work`]: the transaction wrapper repositories write through
//! - [`errors`]: translation of `sqlx` failures into persistence error codes
//!
//! # Example
//!
//! ```ignore
//! use edudesk_db::{DatabaseConfig, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! run_migrations(&pool).await?;
//! ```

pub mod errors;
pub mod unit_of_work;

use std::env;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

pub use errors::{classify_sqlstate, map_sqlx_error};
pub use unit_of_work::{PgUnitOfWork, UnitOfWork, execute_in_unit, require_changes};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error("DATABASE_URL must be set")]
    MissingUrl,
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Connection settings for the PostgreSQL pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Reads `DATABASE_URL` (required) and `DATABASE_MAX_CONNECTIONS`
    /// (default 10).
    pub fn from_env() -> Result<Self, DbInitError> {
        let url = env::var("DATABASE_URL").map_err(|_| DbInitError::MissingUrl)?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);
        Ok(Self {
            url,
            max_connections,
        })
    }
}

/// Initializes a PostgreSQL connection pool.
///
/// The returned pool is cheaply cloneable and should be shared by every
/// repository adapter.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, DbInitError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
        .map_err(DbInitError::Connect)?;

    tracing::info!(
        max_connections = config.max_connections,
        "Database pool initialized"
    );

    Ok(pool)
}

/// Applies the embedded migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbInitError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}
