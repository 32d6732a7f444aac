//! Bridges use-case outcomes into handler results.

use edudesk_core::{AppError, Outcome};

use crate::metrics;

pub trait OutcomeExt<T> {
    /// The success value, or the failure converted to an [`AppError`] whose
    /// status is picked from the error code. Failures are counted by code.
    fn into_app_result(self) -> Result<T, AppError>;
}

impl<T> OutcomeExt<T> for Outcome<T> {
    fn into_app_result(self) -> Result<T, AppError> {
        if self.is_success() {
            return Ok(self.into_value());
        }

        let error = self.into_error();
        metrics::track_outcome_failure(error.code());
        Err(AppError::from(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use edudesk_core::error_info::{PersistenceError, UserError};

    #[test]
    fn test_success_passes_value() {
        assert_eq!(Outcome::ok(5).into_app_result().unwrap(), 5);
    }

    #[test]
    fn test_failure_maps_status_from_code() {
        let err = Outcome::<()>::fail(UserError::InvalidCredentials)
            .into_app_result()
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let err = Outcome::<()>::fail(PersistenceError::ConcurrencyConflict)
            .into_app_result()
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }
}
