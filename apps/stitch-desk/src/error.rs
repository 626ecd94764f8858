//! # API Error Type
//!
//! Unified error type for desk operations and CLI commands.
//!
//! ```text
//! FetchError ──┐
//! DbError ─────┤
//! CoreError ───┼──► ApiError { code, message }
//! PrintError ──┤        ├── PERMISSION_DENIED ──► dismissible notice
//! ConfigError ─┘        └── everything else   ──► error page / exit 1
//! ```
//!
//! Internal details (SQL text, file paths) are logged, not shown.

use std::fmt;

use serde::Serialize;
use stitch_core::CoreError;
use stitch_db::DbError;

use crate::config::ConfigError;
use crate::print::PrintError;
use crate::source::FetchError;

/// Error returned from desk operations.
///
/// ## Serialization
/// With `--json`, a failed command prints:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Order not found: ord-1042"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    /// Shown to the operator as is.
    pub message: String,
}

/// Error codes for desk operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Order or customer does not exist
    NotFound,

    /// Backend refused the read or write
    PermissionDenied,

    /// Malformed input normal operation never produces
    InvalidArgument,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Painting or printing failed
    PrintError,

    /// Configuration could not be loaded
    ConfigError,

    /// Anything else
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// `"Order not found: ord-1042"`
    pub fn not_found(what: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", what, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// True when the error should be shown as a notification the operator
    /// can dismiss, leaving the page usable.
    pub fn is_dismissible(&self) -> bool {
        self.code == ErrorCode::PermissionDenied
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let message = match &err {
            DbError::NotFound { entity, id } => return ApiError::not_found(entity, id),
            DbError::PermissionDenied(detail) => {
                tracing::warn!(detail = %detail, "Database refused the write");
                return ApiError::new(ErrorCode::PermissionDenied, "The database is read-only");
            }
            DbError::UniqueViolation { field, .. } => {
                return ApiError::validation(format!("{} is already taken", field));
            }
            DbError::Validation(detail) => return ApiError::validation(detail.clone()),
            DbError::ForeignKeyViolation { .. } => "A referenced record is missing",
            DbError::Decode(_) => "Stored record could not be read",
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => "Database unavailable",
            DbError::MigrationFailed(_) => "Database schema could not be upgraded",
            DbError::QueryFailed(_) | DbError::Internal(_) => "Database operation failed",
        };

        tracing::error!(error = %err, "Database error");
        ApiError::new(ErrorCode::DatabaseError, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::NotFound { entity, id } => return ApiError::not_found(entity, id),
            CoreError::PermissionDenied(_) => ErrorCode::PermissionDenied,
            CoreError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            CoreError::Validation(e) => return ApiError::validation(e.to_string()),
            CoreError::InvalidOrderStatus { .. } | CoreError::InvalidPaymentAmount { .. } => {
                ErrorCode::ValidationError
            }
        };
        let message = match err {
            CoreError::PermissionDenied(m) | CoreError::InvalidArgument(m) => m,
            other => other.to_string(),
        };
        ApiError::new(code, message)
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            FetchError::PermissionDenied(detail) => {
                tracing::warn!(detail = %detail, "Lookup refused");
                ApiError::new(ErrorCode::PermissionDenied, "Not allowed to read this record")
            }
            FetchError::Transport(detail) => {
                tracing::error!(detail = %detail, "Lookup failed");
                ApiError::new(ErrorCode::DatabaseError, "Could not load the record")
            }
        }
    }
}

impl From<PrintError> for ApiError {
    fn from(err: PrintError) -> Self {
        tracing::error!(error = %err, "Print failed");
        let message = match err {
            PrintError::Cancelled => "Print cancelled",
            PrintError::NothingPainted => "Nothing was painted to print",
            PrintError::Spool { .. } => "Could not write the document",
            PrintError::Command { .. } | PrintError::Failed(_) => "Printing failed",
        };
        ApiError::new(ErrorCode::PrintError, message)
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;
