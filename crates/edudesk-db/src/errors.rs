//! Translation of `sqlx` failures into persistence error codes.
//!
//! Repository adapters never let a `sqlx::Error` escape. Everything is
//! classified here by PostgreSQL SQLSTATE so that callers only ever branch
//! on an [`ErrorInfo`] code.

use edudesk_core::ErrorInfo;
use edudesk_core::error_info::{PersistenceError, ResourceError};

/// Classifies a PostgreSQL SQLSTATE code.
///
/// - `40001` (serialization failure) and `40P01` (deadlock) are concurrency
///   clashes.
/// - Class `23` is an integrity constraint violation.
/// - Classes `25` and `40` are transaction state failures.
/// - Anything else means the change could not be saved.
pub fn classify_sqlstate(code: &str) -> PersistenceError {
    match code {
        "40001" | "40P01" => PersistenceError::ConcurrencyConflict,
        c if c.starts_with("23") => PersistenceError::ConstraintViolation,
        c if c.starts_with("25") || c.starts_with("40") => PersistenceError::FailedTransaction,
        _ => PersistenceError::CanNotSaveChanges,
    }
}

/// Maps any `sqlx` failure onto an [`ErrorInfo`].
pub fn map_sqlx_error(err: sqlx::Error) -> ErrorInfo {
    let info = match &err {
        sqlx::Error::RowNotFound => ErrorInfo::resource(ResourceError::NotFound),
        sqlx::Error::Database(db_err) => {
            let persistence = db_err
                .code()
                .map(|code| classify_sqlstate(&code))
                .unwrap_or(PersistenceError::CanNotSaveChanges);
            let info = ErrorInfo::persistence(persistence);
            match db_err.constraint() {
                Some(constraint) => info.with_message(format!("Constraint `{constraint}` violated")),
                None => info,
            }
        }
        _ => ErrorInfo::persistence(PersistenceError::CanNotSaveChanges),
    };

    tracing::warn!(error = %err, code = %info.code(), "Database operation failed");
    info
}

/// Maps a failure to begin or commit a transaction.
pub(crate) fn map_transaction_error(err: sqlx::Error) -> ErrorInfo {
    match &err {
        sqlx::Error::Database(_) => map_sqlx_error(err),
        _ => {
            tracing::error!(error = %err, "Transaction failed");
            ErrorInfo::persistence(PersistenceError::FailedTransaction)
        }
    }
}
