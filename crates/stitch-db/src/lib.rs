//! # stitch-db: Database Layer for Stitch Desk
//!
//! Local SQLite store for orders and customers, used by the print desk to
//! look up the order being printed and by the CLI for dues and payments.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stitch Desk Data Flow                             │
//! │                                                                         │
//! │  Print desk (fetch_order / fetch_customer)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    stitch-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │  │   │
//! │  │   │ SqlitePool    │◄───│ OrderRepo      │   │ 001_init.sql │  │   │
//! │  │   │               │    │ CustomerRepo   │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │           <data dir>/stitch-desk/stitch.db                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Order and customer repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stitch_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("stitch.db")).await?;
//! let order = db.orders().get_by_id("ord-1042").await?;
//! let dues = db.orders().list_outstanding().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::customer::CustomerRepository;
pub use repository::order::OrderRepository;
