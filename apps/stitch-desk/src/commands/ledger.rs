//! # Ledger Commands
//!
//! `dues`, `pay` and `status`.

use std::fmt;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use stitch_core::format::{DateFormatter, NOT_AVAILABLE};
use stitch_core::ledger::{change_status, record_payment, DuesSummary, SummaryCard};
use stitch_core::{CoreError, Money, Order, OrderStatus};
use stitch_db::Database;

use crate::error::{ApiError, ApiResult};

// =============================================================================
// Dues
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuesResponse {
    pub summary: DuesSummary,
    pub cards: Vec<SummaryCard>,
    pub orders: Vec<DueOrder>,
}

/// One row of the dues list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueOrder {
    pub order_id: String,
    pub order_number: u64,
    pub customer: String,
    pub delivery_date: String,
    pub status: OrderStatus,
    pub balance: Money,
    /// `balance` formatted for display.
    pub balance_text: String,
}

impl fmt::Display for DuesResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self
            .cards
            .iter()
            .map(|card| format!("{}: {}", card.label, card.value))
            .collect();
        write!(f, "{}", cards.join("  |  "))?;

        if self.orders.is_empty() {
            return write!(f, "\nNo outstanding dues.");
        }
        for row in &self.orders {
            write!(
                f,
                "\n#{:<6} {:<24} {:<12} {:<12} {:>14}",
                row.order_number,
                row.customer,
                row.delivery_date,
                row.status.as_str(),
                row.balance_text
            )?;
        }
        Ok(())
    }
}

/// Outstanding orders, earliest delivery first, with the summary cards.
pub async fn list_dues(db: &Database, dates: &DateFormatter) -> ApiResult<DuesResponse> {
    let orders = db.orders().list_outstanding().await?;
    debug!(count = orders.len(), "Loaded outstanding orders");

    let today = dates.local_date(Utc::now());
    let summary = DuesSummary::from_orders(&orders, today, dates);

    let customers = db.customers();
    let mut rows = Vec::with_capacity(orders.len());
    for order in &orders {
        // Orders outlive removed customers; those rows show N/A.
        let customer = if order.customer_id.is_empty() {
            None
        } else {
            customers.get_by_id(&order.customer_id).await?
        };

        rows.push(DueOrder {
            order_id: order.id.clone(),
            order_number: order.order_number,
            customer: customer
                .map(|c| c.name)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            delivery_date: dates.format_or_na(order.delivery_date),
            status: order.status,
            balance: order.balance_due(),
            balance_text: order.balance_due().to_inr(),
        });
    }

    Ok(DuesResponse {
        cards: summary.cards(),
        summary,
        orders: rows,
    })
}

// =============================================================================
// Payments
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub order_id: String,
    pub order_number: u64,
    pub amount: Money,
    pub advance: Money,
    pub balance: Money,
}

impl fmt::Display for PaymentResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order #{}: received {}, total paid {}, balance {}",
            self.order_number, self.amount, self.advance, self.balance
        )
    }
}

/// Takes `amount` (rupees, e.g. `"1500.50"`) against an order's balance.
pub async fn take_payment(db: &Database, order_id: &str, amount: &str) -> ApiResult<PaymentResponse> {
    let amount = Money::parse_rupees(amount).map_err(CoreError::from)?;
    let mut order = load_order(db, order_id).await?;

    let applied = record_payment(&mut order, amount)?;
    db.orders()
        .update_payment(&order.id, applied.advance, applied.balance)
        .await?;

    info!(
        order_id = %order.id,
        amount = %applied.amount,
        balance = %applied.balance,
        "Payment recorded"
    );

    Ok(PaymentResponse {
        order_id: order.id,
        order_number: order.order_number,
        amount: applied.amount,
        advance: applied.advance,
        balance: applied.balance,
    })
}

// =============================================================================
// Status
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub order_id: String,
    pub order_number: u64,
    pub previous: OrderStatus,
    pub status: OrderStatus,
}

impl fmt::Display for StatusResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order #{}: {} -> {}",
            self.order_number, self.previous, self.status
        )
    }
}

/// Moves an order to `status` (`pending`, `in_progress`, `ready`,
/// `delivered`, `cancelled`).
pub async fn change_order_status(
    db: &Database,
    order_id: &str,
    status: &str,
) -> ApiResult<StatusResponse> {
    let next: OrderStatus = status.parse().map_err(CoreError::from)?;
    let mut order = load_order(db, order_id).await?;
    let previous = order.status;

    change_status(&mut order, next)?;
    db.orders().update_status(&order.id, next).await?;

    info!(order_id = %order.id, from = %previous, to = %next, "Order status changed");

    Ok(StatusResponse {
        order_id: order.id,
        order_number: order.order_number,
        previous,
        status: next,
    })
}

async fn load_order(db: &Database, order_id: &str) -> ApiResult<Order> {
    db.orders()
        .get_by_id(order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", order_id))
}
