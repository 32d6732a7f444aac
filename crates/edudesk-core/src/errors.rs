//! HTTP-facing error type.
//!
//! [`AppError`] is what handlers return on failure. Failed outcomes convert
//! into it through `From<ErrorInfo>`, which picks the status code from the
//! error code alone. The body is always
//! `{"error": "<message>", "code": "<code>"}` with `code` omitted for errors
//! that did not come from an outcome (malformed JSON, internal faults).

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::ValidationErrors;

use crate::error_info::{
    AuthError, ErrorCode, ErrorInfo, PersistenceError, RequestError, ResourceError, UserError,
};

/// Marker inserted into responses produced for canceled requests, so the
/// cancellation boundary can recognise them without parsing the body.
/// Every coded failure also carries its [`ErrorCode`] as an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestCanceled;

/// Non-standard `499 Client Closed Request`.
pub fn client_closed_request() -> StatusCode {
    StatusCode::from_u16(499).unwrap_or(StatusCode::REQUEST_TIMEOUT)
}

/// Maps an error code to the HTTP status used to report it.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::User(error) => match error {
            UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            UserError::AttemptExceeded => StatusCode::TOO_MANY_REQUESTS,
            UserError::AlreadyExists => StatusCode::CONFLICT,
            UserError::Inactive | UserError::PermissionDenied => StatusCode::FORBIDDEN,
            UserError::Locked => StatusCode::LOCKED,
            UserError::NotFound => StatusCode::NOT_FOUND,
        },
        ErrorCode::Persistence(error) => match error {
            PersistenceError::NoChanges => StatusCode::NOT_FOUND,
            PersistenceError::ConcurrencyConflict | PersistenceError::ConstraintViolation => {
                StatusCode::CONFLICT
            }
            PersistenceError::CanNotSaveChanges | PersistenceError::FailedTransaction => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        },
        ErrorCode::Auth(error) => match error {
            AuthError::TokenIssueFailed | AuthError::CredentialHashFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
        },
        ErrorCode::Resource(error) => match error {
            ResourceError::NotFound => StatusCode::NOT_FOUND,
            ResourceError::InvalidInput | ResourceError::InvalidRange => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        },
        ErrorCode::Request(RequestError::Canceled) => client_closed_request(),
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: Option<ErrorCode>,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code: None,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn is_canceled(&self) -> bool {
        self.code == Some(ErrorCode::Request(RequestError::Canceled))
    }
}

impl From<ErrorInfo> for AppError {
    fn from(info: ErrorInfo) -> Self {
        let code = info.code();
        Self {
            status: status_for(code),
            code: Some(code),
            error: anyhow::anyhow!("{}", info.display_message()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::unprocessable(errors)
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self::internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match self.code {
            Some(code) => json!({
                "error": self.error.to_string(),
                "code": code.as_str(),
            }),
            None => json!({
                "error": self.error.to_string(),
            }),
        };

        let canceled = self.is_canceled();
        let code = self.code;
        let mut response = (self.status, Json(body)).into_response();
        if let Some(code) = code {
            response.extensions_mut().insert(code);
        }
        if canceled {
            response.extensions_mut().insert(RequestCanceled);
        }
        response
    }
}
