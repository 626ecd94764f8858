//! # Order Repository
//!
//! Database operations for orders.
//!
//! ## Storage Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  orders                                                                 │
//! │  ├── id, order_number, customer_id                                     │
//! │  ├── items          TEXT   JSON array, same shape as the dashboard     │
//! │  ├── subtotal       INTEGER paise                                      │
//! │  ├── advance        INTEGER paise                                      │
//! │  ├── balance        INTEGER paise (stored subtotal - advance)          │
//! │  ├── delivery_date  INTEGER epoch seconds, nullable                    │
//! │  ├── created_at     INTEGER epoch seconds                              │
//! │  └── status         TEXT   pending | in_progress | ready | ...         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{optional_timestamp, timestamp};
use stitch_core::{Money, Order, OrderItem, OrderStatus};

const ORDER_COLUMNS: &str = "id, order_number, customer_id, items, subtotal, advance, balance, \
                             delivery_date, created_at, status";

/// An `orders` row as stored.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: i64,
    customer_id: String,
    items: String,
    subtotal: i64,
    advance: i64,
    balance: i64,
    delivery_date: Option<i64>,
    created_at: i64,
    status: OrderStatus,
}

impl TryFrom<OrderRow> for Order {
    type Error = DbError;

    fn try_from(row: OrderRow) -> DbResult<Self> {
        let items: Vec<OrderItem> = serde_json::from_str(&row.items)
            .map_err(|e| DbError::decode(format!("order {} items: {}", row.id, e)))?;
        let order_number = u64::try_from(row.order_number)
            .map_err(|_| DbError::decode(format!("order number {}", row.order_number)))?;

        Ok(Order {
            order_number,
            customer_id: row.customer_id,
            items,
            subtotal: Money::from_paise(row.subtotal),
            advance: Money::from_paise(row.advance),
            balance: Money::from_paise(row.balance),
            delivery_date: optional_timestamp("delivery_date", row.delivery_date)?,
            created_at: timestamp("created_at", row.created_at)?,
            status: row.status,
            id: row.id,
        })
    }
}

/// Repository for order database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.orders();
/// let order = repo.get_by_id("ord-1042").await?;
/// let dues = repo.list_outstanding().await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(order))` - Order found
    /// * `Ok(None)` - No order with this ID
    /// * `Err(DbError::Decode)` - Stored row is corrupt
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS);
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Order::try_from).transpose()
    }

    /// Gets an order by its printed number.
    pub async fn get_by_number(&self, order_number: u64) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE order_number = ?1", ORDER_COLUMNS);
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(order_number as i64)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Order::try_from).transpose()
    }

    /// Inserts a new order.
    ///
    /// ## Errors
    /// `UniqueViolation` when the id or order number is taken.
    pub async fn insert(&self, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, order_number = order.order_number, "Inserting order");

        let items = serde_json::to_string(&order.items)?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, customer_id, items,
                subtotal, advance, balance,
                delivery_date, created_at, status
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7,
                ?8, ?9, ?10
            )
            "#,
        )
        .bind(&order.id)
        .bind(order.order_number as i64)
        .bind(&order.customer_id)
        .bind(items)
        .bind(order.subtotal.paise())
        .bind(order.advance.paise())
        .bind(order.balance.paise())
        .bind(order.delivery_date.map(|d| d.timestamp()))
        .bind(order.created_at.timestamp())
        .bind(order.status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Next free order number (one past the highest).
    pub async fn next_order_number(&self) -> DbResult<u64> {
        let max: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(order_number), 0) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(max as u64 + 1)
    }

    /// Most recent orders first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders ORDER BY order_number DESC LIMIT ?1",
            ORDER_COLUMNS
        );
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Orders with money still owed, earliest delivery first.
    ///
    /// Same rule as `stitch_core::ledger::outstanding_orders`: not cancelled,
    /// `subtotal - advance > 0`, undated orders last, then by number.
    pub async fn list_outstanding(&self) -> DbResult<Vec<Order>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM orders
            WHERE status != 'cancelled' AND subtotal - advance > 0
            ORDER BY delivery_date IS NULL, delivery_date, order_number
            "#,
            ORDER_COLUMNS
        );
        let rows: Vec<OrderRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Loaded outstanding orders");
        rows.into_iter().map(Order::try_from).collect()
    }

    /// Stores the advance and balance after a payment.
    pub async fn update_payment(&self, id: &str, advance: Money, balance: Money) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                advance = ?2,
                balance = ?3
            WHERE id = ?1 AND status != 'cancelled'
            "#,
        )
        .bind(id)
        .bind(advance.paise())
        .bind(balance.paise())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Stores a new status.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Number of orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::{TimeZone, Utc};
    use stitch_core::ledger::{record_payment, OrderDraft};
    use stitch_core::{Measurements, StitchingDetails};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sample_order(id: &str, number: u64, advance: i64, delivery_day: Option<u32>) -> Order {
        let mut draft = OrderDraft::new("cust-1").with_advance(Money::from_rupees(advance));
        draft
            .add_item(OrderItem::stitching(
                "Sherwani Stitching",
                Money::from_rupees(6000),
                1,
                StitchingDetails {
                    apparel: "Sherwani".to_string(),
                    measurements: Measurements::new()
                        .with("chest", "40")
                        .with("shoulder", "18"),
                    fabric_price: Some(Money::from_rupees(2500)),
                    ..Default::default()
                },
            ))
            .unwrap();
        draft
            .add_item(OrderItem::stock("Stole", Money::from_rupees(2500), 1))
            .unwrap();
        if let Some(day) = delivery_day {
            draft = draft.with_delivery_date(Utc.with_ymd_and_hms(2026, 9, day, 6, 0, 0).unwrap());
        }
        draft
            .into_order(id, number, Utc.with_ymd_and_hms(2026, 9, 1, 5, 0, 0).unwrap())
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = db().await;
        let order = sample_order("ord-1", 1042, 5000, Some(20));
        db.orders().insert(&order).await.unwrap();

        let loaded = db.orders().get_by_id("ord-1").await.unwrap().unwrap();
        assert_eq!(loaded, order);
        assert_eq!(loaded.balance_due(), Money::from_rupees(3500));

        let by_number = db.orders().get_by_number(1042).await.unwrap().unwrap();
        assert_eq!(by_number.id, "ord-1");
    }

    #[tokio::test]
    async fn test_missing_order_is_none() {
        let db = db().await;
        assert!(db.orders().get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_order_number() {
        let db = db().await;
        db.orders()
            .insert(&sample_order("ord-1", 7, 0, None))
            .await
            .unwrap();
        let err = db
            .orders()
            .insert(&sample_order("ord-2", 7, 0, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(db.orders().next_order_number().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_corrupt_items_column() {
        let db = db().await;
        db.orders()
            .insert(&sample_order("ord-1", 1, 0, None))
            .await
            .unwrap();
        sqlx::query("UPDATE orders SET items = 'not json' WHERE id = 'ord-1'")
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.orders().get_by_id("ord-1").await.unwrap_err();
        assert!(matches!(err, DbError::Decode(_)));
    }

    #[tokio::test]
    async fn test_list_outstanding_order() {
        let db = db().await;
        let repo = db.orders();
        repo.insert(&sample_order("a", 10, 0, Some(20))).await.unwrap();
        repo.insert(&sample_order("b", 11, 1000, Some(12))).await.unwrap();
        repo.insert(&sample_order("c", 12, 0, None)).await.unwrap();
        repo.insert(&sample_order("paid", 13, 8500, Some(5))).await.unwrap();
        repo.insert(&sample_order("d", 9, 0, None)).await.unwrap();
        repo.insert(&sample_order("x", 14, 0, Some(1))).await.unwrap();
        repo.update_status("x", OrderStatus::Cancelled).await.unwrap();

        let numbers: Vec<u64> = repo
            .list_outstanding()
            .await
            .unwrap()
            .iter()
            .map(|o| o.order_number)
            .collect();
        assert_eq!(numbers, vec![11, 10, 9, 12]);
        assert_eq!(repo.count().await.unwrap(), 6);
        assert_eq!(repo.list(2).await.unwrap()[0].order_number, 14);
    }

    #[tokio::test]
    async fn test_update_payment_and_status() {
        let db = db().await;
        let repo = db.orders();
        let mut order = sample_order("ord-1", 1, 5000, None);
        repo.insert(&order).await.unwrap();

        let applied = record_payment(&mut order, Money::from_rupees(3500)).unwrap();
        repo.update_payment(&order.id, applied.advance, applied.balance)
            .await
            .unwrap();
        repo.update_status(&order.id, OrderStatus::Ready).await.unwrap();

        let loaded = repo.get_by_id("ord-1").await.unwrap().unwrap();
        assert_eq!(loaded.advance, Money::from_rupees(8500));
        assert!(loaded.balance.is_zero());
        assert_eq!(loaded.status, OrderStatus::Ready);

        assert!(matches!(
            repo.update_status("ghost", OrderStatus::Ready).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
