//! # Validation Module
//!
//! Input validation for order intake and customer entry.
//!
//! Text from the CLI is parsed first (`Money::parse_rupees`, status names),
//! then checked here by `OrderDraft` and `CustomerRepository::insert`
//! before anything reaches SQLite. The schema's CHECK and UNIQUE constraints
//! are the last line.
//!
//! ## Usage
//! ```rust
//! use stitch_core::validation::{validate_item_name, validate_quantity};
//!
//! validate_item_name("Sherwani Stitching").unwrap();
//! validate_quantity(2).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_ITEMS};

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest item or customer name accepted.
pub const MAX_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

fn validate_name_field(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a line item name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use stitch_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Silk Kurta").is_ok());
/// assert!(validate_item_name("  ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_name_field("item name", name)
}

/// Validates a customer name. Same rules as item names.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_name_field("customer name", name)
}

/// Validates the apparel name of a stitching line.
pub fn validate_apparel(apparel: &str) -> ValidationResult<()> {
    validate_name_field("apparel", apparel)
}

/// Validates and normalizes an Indian mobile number.
///
/// ## Rules
/// - Spaces and hyphens are ignored
/// - An optional `+91` or leading `0` is stripped
/// - What remains must be 10 digits starting with 6, 7, 8 or 9
///
/// ## Returns
/// The bare 10-digit number.
///
/// ## Example
/// ```rust
/// use stitch_core::validation::normalize_phone;
///
/// assert_eq!(normalize_phone("+91 98765-43210").unwrap(), "9876543210");
/// assert_eq!(normalize_phone("09876543210").unwrap(), "9876543210");
/// assert!(normalize_phone("12345").is_err());
/// ```
pub fn normalize_phone(phone: &str) -> ValidationResult<String> {
    let compact: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if compact.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let digits = if let Some(rest) = compact.strip_prefix("+91") {
        rest
    } else if compact.len() == 11 {
        compact.strip_prefix('0').unwrap_or(&compact)
    } else {
        compact.as_str()
    };

    let valid = digits.len() == 10
        && digits.chars().all(|c| c.is_ascii_digit())
        && matches!(digits.as_bytes()[0], b'6'..=b'9');

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be a 10-digit mobile number".to_string(),
        });
    }

    Ok(digits.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Quantity of a line: `1..=MAX_ITEM_QUANTITY`.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (complimentary alterations).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an advance against the order subtotal.
///
/// ## Rules
/// - Not negative
/// - Not more than the subtotal
pub fn validate_advance(advance: Money, subtotal: Money) -> ValidationResult<()> {
    if advance.is_negative() || advance > subtotal {
        return Err(ValidationError::OutOfRange {
            field: "advance".to_string(),
            min: 0,
            max: subtotal.paise(),
        });
    }

    Ok(())
}

/// Validates a payment amount. Must be positive.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of lines on an order.
///
/// ## Rules
/// - At least one line
/// - At most MAX_ORDER_ITEMS (200)
pub fn validate_item_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if count > MAX_ORDER_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
