//! The single write path repositories go through.
//!
//! A unit of work wraps one database transaction. Repositories stage their
//! statements through it and finish with [`UnitOfWork::save_changes`], which
//! commits and reports how many rows were changed. A failed commit is a
//! `Error_EFCore_*` failure; a count of zero is still a successful save, and
//! callers that need a mutation to have happened use [`require_changes`].
//!
//! Dropping a unit of work without saving rolls the transaction back, which
//! is what makes a canceled operation leave no trace.

use async_trait::async_trait;
use edudesk_core::ErrorInfo;
use edudesk_core::error_info::PersistenceError;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::errors::{map_sqlx_error, map_transaction_error};

#[async_trait]
pub trait UnitOfWork: Send {
    /// Persists every staged change and returns how many rows changed.
    async fn save_changes(self) -> Result<u64, ErrorInfo>
    where
        Self: Sized;
}

/// Turns a change count of zero into `Error_EFCore_NoChanges`.
pub fn require_changes(count: u64) -> Result<u64, ErrorInfo> {
    if count == 0 {
        Err(ErrorInfo::persistence(PersistenceError::NoChanges))
    } else {
        Ok(count)
    }
}

/// A PostgreSQL transaction that tracks the rows it changed.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
    changes: u64,
}

impl PgUnitOfWork {
    pub async fn begin(pool: &PgPool) -> Result<Self, ErrorInfo> {
        let tx = pool.begin().await.map_err(map_transaction_error)?;
        Ok(Self { tx, changes: 0 })
    }

    /// Connection for reads and `RETURNING` statements inside the
    /// transaction. Rows changed through it must be reported with
    /// [`PgUnitOfWork::track`].
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    pub fn track(&mut self, rows: u64) -> u64 {
        self.changes += rows;
        rows
    }

    /// Executes a statement and records the rows it affected.
    pub async fn execute(
        &mut self,
        query: Query<'_, Postgres, PgArguments>,
    ) -> Result<u64, ErrorInfo> {
        let rows = query
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?
            .rows_affected();
        Ok(self.track(rows))
    }

    pub fn pending_changes(&self) -> u64 {
        self.changes
    }
}

/// Runs a single statement in its own unit of work and returns the rows it
/// changed.
pub async fn execute_in_unit(
    pool: &PgPool,
    query: Query<'_, Postgres, PgArguments>,
) -> Result<u64, ErrorInfo> {
    let mut uow = PgUnitOfWork::begin(pool).await?;
    uow.execute(query).await?;
    uow.save_changes().await
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn save_changes(self) -> Result<u64, ErrorInfo> {
        let changes = self.changes;
        self.tx.commit().await.map_err(map_transaction_error)?;
        tracing::debug!(changes, "Unit of work committed");
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_changes() {
        assert_eq!(require_changes(3), Ok(3));
        let err = require_changes(0).unwrap_err();
        assert!(err.is(PersistenceError::NoChanges));
    }
}
