//! # Order Source
//!
//! Where a document view gets its order and customer from.
//!
//! ## Fetch Results
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch_order("ord-1042")                                               │
//! │       │                                                                 │
//! │       ├── Ok(order)                     ──► compose                     │
//! │       ├── Err(NotFound)                 ──► "Order not found"           │
//! │       └── Err(PermissionDenied |                                        │
//! │               Transport)                ──► error page                  │
//! │                                                                         │
//! │  fetch_customer(order.customer_id)                                     │
//! │       ├── Ok(customer)                  ──► bill-to / slip block        │
//! │       ├── Err(NotFound)                 ──► "N/A"                       │
//! │       └── Err(PermissionDenied |                                        │
//! │               Transport)                ──► "N/A" + notification       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The source is injected into the view. Nothing here retries.

use std::collections::HashMap;
use std::future::Future;

use thiserror::Error;
use tracing::debug;

use stitch_core::{Customer, Order};
use stitch_db::{Database, DbError};

// =============================================================================
// Fetch Error
// =============================================================================

/// Why a record could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No record with this id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The backend refused the read.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The backend could not be reached or returned garbage.
    #[error("Fetch failed: {0}")]
    Transport(String),
}

impl FetchError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        FetchError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

impl From<DbError> for FetchError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => FetchError::NotFound { entity, id },
            DbError::PermissionDenied(message) => FetchError::PermissionDenied(message),
            other => FetchError::Transport(other.to_string()),
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

// =============================================================================
// Order Source Trait
// =============================================================================

/// Read access to orders and customers.
pub trait OrderSource: Send + Sync {
    /// Fetches an order by id.
    fn fetch_order(&self, id: &str) -> impl Future<Output = FetchResult<Order>> + Send;

    /// Fetches a customer by id.
    fn fetch_customer(&self, id: &str) -> impl Future<Output = FetchResult<Customer>> + Send;
}

// =============================================================================
// Database Source
// =============================================================================

/// Orders and customers from the local SQLite store.
#[derive(Debug, Clone)]
pub struct DbSource {
    db: Database,
}

impl DbSource {
    pub fn new(db: Database) -> Self {
        DbSource { db }
    }
}

impl OrderSource for DbSource {
    async fn fetch_order(&self, id: &str) -> FetchResult<Order> {
        debug!(order_id = %id, "Fetching order");
        self.db
            .orders()
            .get_by_id(id)
            .await?
            .ok_or_else(|| FetchError::not_found("Order", id))
    }

    async fn fetch_customer(&self, id: &str) -> FetchResult<Customer> {
        debug!(customer_id = %id, "Fetching customer");
        self.db
            .customers()
            .get_by_id(id)
            .await?
            .ok_or_else(|| FetchError::not_found("Customer", id))
    }
}

// =============================================================================
// In-Memory Source
// =============================================================================

/// Fixed set of records, with optional failures for every customer read.
///
/// Used by tests and for previewing documents without a database.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    orders: HashMap<String, Order>,
    customers: HashMap<String, Customer>,
    customer_failure: Option<FetchError>,
    order_failure: Option<FetchError>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.orders.insert(order.id.clone(), order);
        self
    }

    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customers.insert(customer.id.clone(), customer);
        self
    }

    /// Every `fetch_order` fails with `err`.
    pub fn failing_orders(mut self, err: FetchError) -> Self {
        self.order_failure = Some(err);
        self
    }

    /// Every `fetch_customer` fails with `err`.
    pub fn failing_customers(mut self, err: FetchError) -> Self {
        self.customer_failure = Some(err);
        self
    }
}

impl OrderSource for MemorySource {
    async fn fetch_order(&self, id: &str) -> FetchResult<Order> {
        if let Some(err) = &self.order_failure {
            return Err(err.clone());
        }
        self.orders
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::not_found("Order", id))
    }

    async fn fetch_customer(&self, id: &str) -> FetchResult<Customer> {
        if let Some(err) = &self.customer_failure {
            return Err(err.clone());
        }
        self.customers
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::not_found("Customer", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stitch_core::{Money, OrderStatus};
    use stitch_db::DbConfig;

    fn order(id: &str) -> Order {
        Order {
            id: id.to_string(),
            order_number: 1042,
            customer_id: "c1".to_string(),
            items: Vec::new(),
            subtotal: Money::from_rupees(800),
            advance: Money::zero(),
            balance: Money::from_rupees(800),
            delivery_date: None,
            created_at: Utc.with_ymd_and_hms(2026, 9, 5, 6, 0, 0).unwrap(),
            status: OrderStatus::Pending,
        }
    }

    #[test]
    fn test_db_error_mapping() {
        assert!(FetchError::from(DbError::not_found("Order", "x")).is_not_found());
        assert_eq!(
            FetchError::from(DbError::PermissionDenied("readonly".into())),
            FetchError::PermissionDenied("readonly".into())
        );
        assert!(matches!(
            FetchError::from(DbError::PoolExhausted),
            FetchError::Transport(_)
        ));
    }

    #[tokio::test]
    async fn test_memory_source() {
        let source = MemorySource::new().with_order(order("o1"));

        assert_eq!(source.fetch_order("o1").await.unwrap().order_number, 1042);
        assert!(source.fetch_order("o2").await.unwrap_err().is_not_found());
        assert!(source.fetch_customer("c1").await.unwrap_err().is_not_found());

        let denied = source.failing_customers(FetchError::PermissionDenied("rules".into()));
        assert_eq!(
            denied.fetch_customer("c1").await,
            Err(FetchError::PermissionDenied("rules".into()))
        );
    }

    #[tokio::test]
    async fn test_db_source_missing_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let source = DbSource::new(db);

        let err = source.fetch_order("missing").await.unwrap_err();
        assert_eq!(err, FetchError::not_found("Order", "missing"));
    }
}
