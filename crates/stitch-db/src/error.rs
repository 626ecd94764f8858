//! # Database Error Types
//!
//! ## Error Flow
//! ```text
//!   sqlx::Error ─────┐
//!   MigrateError ────┼──► DbError ──► FetchError (print desk)
//!   serde_json ──────┘        └─────► ApiError   (ledger commands)
//!
//!   FetchError::NotFound          → "Order not found" page
//!   FetchError::PermissionDenied  → dismissible notice (customer lookups)
//! ```

use thiserror::Error;

/// SQLite primary result codes that mean "you may not do this".
const SQLITE_PERM: i32 = 3;
const SQLITE_READONLY: i32 = 8;
const SQLITE_AUTH: i32 = 23;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row with that id.
    ///
    /// Raised by updates against a missing order. Plain lookups return
    /// `Ok(None)` instead.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The database refused access.
    ///
    /// ## When This Occurs
    /// - Database file opened read-only, or on a read-only mount
    /// - File permissions deny writing
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// An order number, order id or customer id was already taken.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Raised only by tables that declare foreign keys.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Input rejected before it reached SQLite, such as a malformed phone.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A stored column could not be turned back into a domain value.
    ///
    /// ## When This Occurs
    /// - Items column is not valid JSON
    /// - Timestamp outside the representable range
    #[error("Corrupt row: {0}")]
    Decode(String),

    /// The file could not be opened, or the pool was closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected the statement for some other reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// `DbError::not_found("Order", "ord-1042")`
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DbError::Validation(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        DbError::Decode(message.into())
    }
}

/// ```text
/// sqlx::Error::RowNotFound        → DbError::NotFound
/// SQLITE_READONLY / PERM / AUTH   → DbError::PermissionDenied
/// UNIQUE / FOREIGN KEY failures   → constraint variants
/// sqlx::Error::ColumnDecode       → DbError::Decode
/// sqlx::Error::PoolTimedOut       → DbError::PoolExhausted
/// Other                           → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // Extended result codes carry the primary code in the low byte.
                let primary = db_err
                    .code()
                    .and_then(|code| code.parse::<i32>().ok())
                    .map(|code| code & 0xff);

                if matches!(primary, Some(SQLITE_READONLY | SQLITE_PERM | SQLITE_AUTH)) {
                    DbError::PermissionDenied(msg.to_string())
                } else if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::duplicate(field, "unknown")
                } else if msg.starts_with("FOREIGN KEY") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::ColumnDecode { index, source } => {
                DbError::Decode(format!("column {}: {}", index, source))
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("database is closed".to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Decode(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
