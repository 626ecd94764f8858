//! # stitch-core: Pure Business Logic for Stitch Desk
//!
//! This crate is the **heart** of Stitch Desk. It turns tailoring orders into
//! printable documents and keeps the money rules of the shop, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stitch Desk Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 stitch-desk (Print Desk + CLI)                  │   │
//! │  │    fetch order ──► compose ──► paint HTML ──► deferred print    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stitch-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  paginate │  │ document  │  │  ledger   │  │   │
//! │  │   │   Order   │  │  classify │  │  Invoice  │  │  Dues     │  │   │
//! │  │   │  Customer │  │  format   │  │  Slips    │  │  Payments │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TIMERS • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   stitch-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order, OrderItem, Customer, ...)
//! - [`money`] - Money in paise with en-IN formatting
//! - [`format`] - Date formatting and measurement key humanizing
//! - [`classify`] - Line item classification
//! - [`paginate`] - Fixed-size page chunking
//! - [`document`] - Invoice and measurement slip composers
//! - [`ledger`] - Order intake, payments, outstanding dues
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use stitch_core::money::Money;
//! use stitch_core::paginate::paginate;
//!
//! let subtotal = Money::from_rupees(8500);
//! let advance = Money::from_rupees(5000);
//! assert_eq!((subtotal - advance).to_inr(), "₹3,500.00");
//!
//! let items: Vec<u32> = (1..=13).collect();
//! let pages = paginate(&items, 12).unwrap();
//! assert_eq!(pages.len(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod classify;
pub mod document;
pub mod error;
pub mod format;
pub mod ledger;
pub mod money;
pub mod paginate;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Line items per printed invoice page (5in × 8in).
pub const INVOICE_PAGE_SIZE: usize = 12;

/// Stitching items per measurement slip (5in × 5in).
pub const SLIP_PAGE_SIZE: usize = 2;

/// Delay between painting a document and opening the print dialog.
///
/// Gives layout time to settle before the page is captured.
pub const PRINT_SETTLE_DELAY_MS: u64 = 500;

/// Maximum quantity of a single line item.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum line items on one order.
pub const MAX_ORDER_ITEMS: usize = 200;
