//! # Formatting Helpers
//!
//! Date and label formatting for printed documents. Currency lives on
//! [`Money`](crate::money::Money).
//!
//! ## Dates
//! Printed dates follow en-IN `day month year` with an abbreviated month:
//! `5 Sept 2026`. Stored timestamps are epoch seconds in UTC and are shifted
//! to the shop's local offset (IST by default) before the calendar day is
//! taken, so an order entered at 1:00 AM IST prints with the right day.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Utc};

/// India Standard Time, UTC+05:30, in minutes.
pub const IST_OFFSET_MINUTES: i32 = 330;

/// Shown wherever a value is missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// en-IN abbreviated month names. September is four letters.
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sept", "Oct", "Nov", "Dec",
];

// =============================================================================
// Date Formatter
// =============================================================================

/// Formats timestamps as local calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormatter {
    offset: FixedOffset,
}

impl DateFormatter {
    /// Creates a formatter for the given UTC offset in minutes.
    ///
    /// Returns `None` when the offset is outside ±24h.
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| DateFormatter { offset })
    }

    /// Formatter for India Standard Time.
    pub fn ist() -> Self {
        DateFormatter::with_offset_minutes(IST_OFFSET_MINUTES)
            .unwrap_or(DateFormatter { offset: Utc.fix() })
    }

    /// Local calendar day of a timestamp.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// Formats a timestamp: `19 Oct 2026`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use stitch_core::format::DateFormatter;
    ///
    /// let fmt = DateFormatter::ist();
    /// let at = Utc.with_ymd_and_hms(2026, 9, 4, 20, 0, 0).unwrap();
    /// // 20:00 UTC is already the next morning in India.
    /// assert_eq!(fmt.format(at), "5 Sept 2026");
    /// ```
    pub fn format(&self, at: DateTime<Utc>) -> String {
        format_date(self.local_date(at))
    }

    /// Formats an optional timestamp, `N/A` when absent.
    pub fn format_or_na(&self, at: Option<DateTime<Utc>>) -> String {
        at.map(|at| self.format(at))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Formats epoch seconds; `None` when out of chrono's range.
    pub fn format_epoch_seconds(&self, secs: i64) -> Option<String> {
        from_epoch_seconds(secs).map(|at| self.format(at))
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        DateFormatter::ist()
    }
}

/// Converts stored epoch seconds into a UTC timestamp.
pub fn from_epoch_seconds(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Formats a calendar date as en-IN `day month year`.
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

// =============================================================================
// Labels
// =============================================================================

/// Turns a camelCase measurement field into a printable label.
///
/// A space goes before every capital letter, then the ends are trimmed.
/// Letters keep their case.
///
/// ## Example
/// ```rust
/// use stitch_core::format::humanize_key;
///
/// assert_eq!(humanize_key("shirtLength"), "shirt Length");
/// assert_eq!(humanize_key("Chest"), "Chest");
/// ```
pub fn humanize_key(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(c);
    }
    label.trim().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
