//! # Repository Module
//!
//! Database repository implementations for Stitch Desk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Print desk / CLI                                                      │
//! │       │                                                                 │
//! │       │  db.orders().get_by_id("ord-1042")                             │
//! │       ▼                                                                 │
//! │  OrderRepository                    CustomerRepository                 │
//! │  ├── get_by_id                      ├── get_by_id                      │
//! │  ├── insert / next_order_number     ├── insert                         │
//! │  ├── list / list_outstanding        ├── find_by_phone                  │
//! │  └── update_payment / update_status └── list                           │
//! │       │                                                                 │
//! │       │  SQL Query → row struct → domain type                          │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are read into private `*Row` structs and converted to stitch-core
//! types, so JSON columns and epoch-second timestamps stay out of the domain
//! model.

pub mod customer;
pub mod order;

use chrono::{DateTime, Utc};

use crate::error::{DbError, DbResult};

/// Converts a stored epoch-second column.
pub(crate) fn timestamp(column: &str, secs: i64) -> DbResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| DbError::decode(format!("{} out of range: {}", column, secs)))
}

/// Converts an optional epoch-second column.
pub(crate) fn optional_timestamp(
    column: &str,
    secs: Option<i64>,
) -> DbResult<Option<DateTime<Utc>>> {
    secs.map(|s| timestamp(column, s)).transpose()
}
