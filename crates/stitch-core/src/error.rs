//! # Error Types
//!
//! ```text
//! ValidationError ──► CoreError ──► ApiError { code, message }
//!   (intake input)     (domain)      (stitch-desk, shown to the operator)
//! ```
//!
//! `DbError` lives in stitch-db and joins the same path at `ApiError`.
//!
//! None of these errors is retried. A failure ends the current render and the
//! operator reloads to try again.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by composition, pagination and the ledger.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record with the given id does not exist.
    ///
    /// ## When This Occurs
    /// - Order or customer id has no matching document
    /// - Ledger lookup for an order that was never created
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The backend refused the read or write.
    ///
    /// Shown as a dismissible notification, never fatal to the page.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Malformed input that normal operation never produces.
    ///
    /// ## When This Occurs
    /// - Pagination with a page size of zero
    /// - Measurement values that are neither text nor numbers
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Order is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Taking a payment on a cancelled order
    /// - Moving a delivered order back to `ready`
    #[error("Order #{order_number} is {current_status}, cannot {operation}")]
    InvalidOrderStatus {
        order_number: u64,
        current_status: String,
        operation: String,
    },

    /// Zero, negative, or more than the balance due.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CoreError::InvalidArgument(message.into())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors raised during order intake and customer entry.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Empty after trimming.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Quantities and similar bounded counts.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Phone numbers, e-mail addresses, rupee amounts.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Status names and other closed vocabularies.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::not_found("Order", "ord-42");
        assert_eq!(err.to_string(), "Order not found: ord-42");

        let err = CoreError::InvalidOrderStatus {
            order_number: 17,
            current_status: "cancelled".to_string(),
            operation: "take payment".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Order #17 is cancelled, cannot take payment"
        );
    }

    #[test]
    fn test_intake_messages() {
        let missing = ValidationError::Required {
            field: "apparel".to_string(),
        };
        assert_eq!(missing.to_string(), "apparel is required");

        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 999,
        };
        assert_eq!(err.to_string(), "quantity must be between 1 and 999");
    }

    #[test]
    fn test_intake_error_wraps_into_core() {
        let err: CoreError = ValidationError::MustBePositive {
            field: "price".to_string(),
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(err.to_string(), "Validation error: price must be positive");
    }
}
