//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Integer Paise
//! Amounts are whole paise in an `i64` (1 rupee = 100 paise), so the invoice
//! arithmetic is exact:
//! ```text
//!   subtotal 850000 − advance 500000 = balance 350000
//!   ₹8,500.00      − ₹5,000.00      = ₹3,500.00
//! ```
//!
//! ## en-IN Formatting
//! Indian digit grouping keeps the last three digits together and groups the
//! rest in pairs: `₹12,34,567.50`.
//!
//! ## Usage
//! ```rust
//! use stitch_core::money::Money;
//!
//! let price = Money::from_rupees(1250);
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.to_inr(), "₹3,750.00");
//! assert_eq!(Money::from_paise(123_456_750).to_inr(), "₹12,34,567.50");
//! assert_eq!(Money::from_paise(349_950).to_inr_whole(), "₹3,500");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::error::ValidationError;

/// Currency symbol for INR.
pub const RUPEE_SYMBOL: &str = "₹";

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise (the smallest INR unit).
///
/// Signed, because the invoice prints the advance as a deduction. JSON and
/// database columns carry the bare paise integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use stitch_core::money::Money;
    ///
    /// let price = Money::from_paise(109_950); // ₹1,099.50
    /// assert_eq!(price.paise(), 109_950);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// For negative amounts, only the rupee part should be negative:
    /// `from_rupees_paise(-5, 50)` is -₹5.50.
    #[inline]
    pub const fn from_rupees_paise(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees * 100 - paise)
        } else {
            Money(rupees * 100 + paise)
        }
    }

    /// Parses an operator-typed rupee amount such as `"1500"` or `"1,500.5"`.
    ///
    /// ## Rules
    /// - Optional leading `₹`, grouping commas are ignored
    /// - At most two decimal places
    /// - No negative amounts (payments and prices are never typed negative)
    ///
    /// ## Example
    /// ```rust
    /// use stitch_core::money::Money;
    ///
    /// assert_eq!(Money::parse_rupees("1,500.5").unwrap().paise(), 150_050);
    /// assert_eq!(Money::parse_rupees("₹20").unwrap().paise(), 2_000);
    /// assert!(Money::parse_rupees("12.345").is_err());
    /// assert!(Money::parse_rupees("-4").is_err());
    /// ```
    pub fn parse_rupees(input: &str) -> Result<Money, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let cleaned: String = input
            .trim()
            .trim_start_matches(RUPEE_SYMBOL)
            .chars()
            .filter(|c| *c != ',')
            .collect();

        if cleaned.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        let (whole, frac) = match cleaned.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (cleaned.as_str(), ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("expected digits"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("expected a non-negative rupee amount"));
        }
        if frac.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let rupees: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount is too large"))?
        };
        let paise: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("bad paise"))? * 10,
            _ => frac.parse().map_err(|_| invalid("bad paise"))?,
        };

        rupees
            .checked_mul(100)
            .and_then(|p| p.checked_add(paise))
            .map(Money)
            .ok_or_else(|| invalid("amount is too large"))
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Line amount for `qty` units at this price, saturating at the `i64`
    /// bounds.
    ///
    /// ## Example
    /// ```rust
    /// use stitch_core::money::Money;
    ///
    /// let unit_price = Money::from_rupees(450);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_rupees(1350));
    /// assert_eq!(unit_price.checked_multiply_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// `None` when the line amount does not fit.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(paise) => Some(Money(paise)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(paise) => Some(Money(paise)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(paise) => Some(Money(paise)),
            None => None,
        }
    }

    /// Formats as en-IN INR with two fraction digits: `₹1,23,456.00`.
    pub fn to_inr(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!(
            "{}{}{}.{:02}",
            sign,
            RUPEE_SYMBOL,
            group_indian(abs / 100),
            abs % 100
        )
    }

    /// Formats as en-IN INR without fraction digits: `₹1,23,456`.
    ///
    /// Used on summary cards. Half a rupee rounds away from zero.
    pub fn to_inr_whole(&self) -> String {
        let abs = self.0.unsigned_abs();
        let rupees = (abs + 50) / 100;
        let sign = if self.0 < 0 && rupees > 0 { "-" } else { "" };
        format!("{}{}{}", sign, RUPEE_SYMBOL, group_indian(rupees))
    }
}

/// Groups digits the Indian way: `1234567` → `12,34,567`.
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

// =============================================================================
// Trait Implementations
// =============================================================================

// Operators saturate so a corrupt stored figure cannot panic a render. Code
// that must report overflow uses the `checked_*` methods.

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_inr())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
