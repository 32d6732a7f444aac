//! Structured failure values returned inside failed outcomes.
//!
//! Every expected failure in the system is an [`ErrorInfo`] identified by a
//! stable, machine-readable code such as `Error_User_InvalidCredentials`.
//! Codes are grouped into closed enumerations per domain so that matching on
//! them is checked at compile time, while [`ErrorCode::as_str`] and
//! [`ErrorCode::from_str`] keep the original string form for any consumer that
//! already branches on it.
//!
//! # Example
//!
//! ```
//! use edudesk_core::error_info::{ErrorCode, ErrorInfo, UserError};
//!
//! let error: ErrorInfo = UserError::InvalidCredentials.into();
//! assert_eq!(error.code().as_str(), "Error_User_InvalidCredentials");
//! assert_eq!(error, ErrorInfo::user(UserError::InvalidCredentials));
//! assert_eq!(
//!     "Error_User_InvalidCredentials".parse::<ErrorCode>().unwrap(),
//!     error.code()
//! );
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Defines one closed error domain with its string codes and default messages.
macro_rules! error_domain {
    (
        $(#[$meta:meta])*
        pub enum $name:ident => $wrapper:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $code:literal, $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant of this domain, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The stable string code of this variant.
            pub const fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Human-readable fallback text used when no message was attached.
            pub const fn default_message(self) -> &'static str {
                match self {
                    $(Self::$variant => $message,)+
                }
            }

            fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl std::error::Error for $name {}

        impl From<$name> for ErrorCode {
            fn from(value: $name) -> Self {
                ErrorCode::$wrapper(value)
            }
        }

        impl From<$name> for ErrorInfo {
            fn from(value: $name) -> Self {
                ErrorInfo::new(value)
            }
        }
    };
}

error_domain! {
    /// Account and identity failures.
    pub enum UserError => User {
        InvalidCredentials => "Error_User_InvalidCredentials", "Invalid email or password",
        AttemptExceeded => "Error_User_AttemptExceeded", "Too many failed login attempts; the account is now locked",
        AlreadyExists => "Error_User_AlreadyExists", "A user with this email already exists",
        Inactive => "Error_User_Inactive", "This account is inactive",
        Locked => "Error_User_Locked", "This account is temporarily locked",
        NotFound => "Error_User_NotFound", "User not found",
        PermissionDenied => "Error_User_PermissionDenied", "You do not have permission to perform this action",
    }
}

error_domain! {
    /// Failures reported by the data-access layer.
    ///
    /// The `EFCore` namespace is kept in the string codes for compatibility
    /// with clients that already branch on them.
    pub enum PersistenceError => Persistence {
        NoChanges => "Error_EFCore_NoChanges", "No changes were persisted",
        CanNotSaveChanges => "Error_EFCore_CanNotSaveChanges", "Changes could not be saved",
        FailedTransaction => "Error_EFCore_FailedTransaction", "The transaction failed",
        ConcurrencyConflict => "Error_EFCore_ConcurrencyConflict", "The record was modified by another request",
        ConstraintViolation => "Error_EFCore_ConstraintViolation", "The change violates a data constraint",
    }
}

error_domain! {
    /// Bearer token and credential handling failures.
    pub enum AuthError => Auth {
        MissingToken => "Error_Auth_MissingToken", "Missing authorization header",
        InvalidToken => "Error_Auth_InvalidToken", "Invalid authorization token",
        ExpiredToken => "Error_Auth_ExpiredToken", "Authorization token has expired",
        TokenIssueFailed => "Error_Auth_TokenIssueFailed", "Failed to issue an authorization token",
        CredentialHashFailed => "Error_Auth_CredentialHashFailed", "Failed to process credentials",
    }
}

error_domain! {
    /// Failures about the addressed resource or the shape of the input.
    pub enum ResourceError => Resource {
        NotFound => "Error_Resource_NotFound", "Resource not found",
        InvalidInput => "Error_Resource_InvalidInput", "Invalid input",
        InvalidRange => "Error_Resource_InvalidRange", "The requested range is invalid",
    }
}

error_domain! {
    /// Failures of the request itself rather than the operation.
    pub enum RequestError => Request {
        Canceled => "Error_Request_Canceled", "Request canceled by client",
    }
}

/// Any error code of any domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    User(UserError),
    Persistence(PersistenceError),
    Auth(AuthError),
    Resource(ResourceError),
    Request(RequestError),
}

impl ErrorCode {
    /// The stable string form, e.g. `Error_EFCore_ConcurrencyConflict`.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::User(e) => e.code(),
            ErrorCode::Persistence(e) => e.code(),
            ErrorCode::Auth(e) => e.code(),
            ErrorCode::Resource(e) => e.code(),
            ErrorCode::Request(e) => e.code(),
        }
    }

    pub const fn default_message(self) -> &'static str {
        match self {
            ErrorCode::User(e) => e.default_message(),
            ErrorCode::Persistence(e) => e.default_message(),
            ErrorCode::Auth(e) => e.default_message(),
            ErrorCode::Resource(e) => e.default_message(),
            ErrorCode::Request(e) => e.default_message(),
        }
    }

    /// The domain segment of the code (`User`, `EFCore`, `Auth`, ...).
    pub const fn domain(self) -> &'static str {
        match self {
            ErrorCode::User(_) => "User",
            ErrorCode::Persistence(_) => "EFCore",
            ErrorCode::Auth(_) => "Auth",
            ErrorCode::Resource(_) => "Resource",
            ErrorCode::Request(_) => "Request",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a string that is not a known error code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error code `{0}`")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserError::from_code(s)
            .map(ErrorCode::User)
            .or_else(|| PersistenceError::from_code(s).map(ErrorCode::Persistence))
            .or_else(|| AuthError::from_code(s).map(ErrorCode::Auth))
            .or_else(|| ResourceError::from_code(s).map(ErrorCode::Resource))
            .or_else(|| RequestError::from_code(s).map(ErrorCode::Request))
            .ok_or_else(|| UnknownErrorCode(s.to_string()))
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A code-identified failure with optional presentational text.
///
/// Two values are equal when their codes are equal; the message never takes
/// part in comparisons and callers should only branch on [`ErrorInfo::code`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ErrorInfo {
    pub fn new(code: impl Into<ErrorCode>) -> Self {
        Self {
            code: code.into(),
            message: None,
        }
    }

    /// Returns a copy carrying `message` as its human-readable text.
    #[must_use]
    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self {
            code: self.code,
            message: Some(message.into()),
        }
    }

    pub fn user(error: UserError) -> Self {
        Self::new(error)
    }

    pub fn persistence(error: PersistenceError) -> Self {
        Self::new(error)
    }

    pub fn auth(error: AuthError) -> Self {
        Self::new(error)
    }

    pub fn resource(error: ResourceError) -> Self {
        Self::new(error)
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(ResourceError::NotFound).with_message(format!("{what} not found"))
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ResourceError::InvalidInput).with_message(message)
    }

    pub fn canceled() -> Self {
        Self::new(RequestError::Canceled)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The attached message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The attached message or the code's default text.
    pub fn display_message(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.code.default_message())
    }

    pub fn is(&self, code: impl Into<ErrorCode>) -> bool {
        self.code == code.into()
    }

    pub fn is_canceled(&self) -> bool {
        self.is(RequestError::Canceled)
    }
}

impl PartialEq for ErrorInfo {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for ErrorInfo {}

impl Hash for ErrorInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.code, message),
            None => write!(f, "{}", self.code),
        }
    }
}

impl std::error::Error for ErrorInfo {}

impl From<ErrorCode> for ErrorInfo {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}
