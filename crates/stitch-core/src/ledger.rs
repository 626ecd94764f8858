//! # Order Ledger
//!
//! The money side of an order: intake, payments, status changes and the
//! outstanding-dues board.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  OrderDraft ──add_item()──► OrderDraft ──into_order()──► Order          │
//! │                                                 (Pending, balance set)  │
//! │                                                            │            │
//! │        ┌───────────────────────────┬───────────────────────┤            │
//! │        ▼                           ▼                       ▼            │
//! │  record_payment()           change_status()        outstanding_orders() │
//! │  advance += amount          can_transition_to()    DuesSummary          │
//! │  balance = subtotal-advance                                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here works on values; persisting the result is the caller's
//! job.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::format::DateFormatter;
use crate::money::Money;
use crate::types::{ItemKind, Order, OrderItem, OrderStatus};
use crate::validation::{
    validate_advance, validate_apparel, validate_item_count, validate_item_name,
    validate_payment_amount, validate_price, validate_quantity,
};

// =============================================================================
// Order Intake
// =============================================================================

/// An order being written up at the counter.
///
/// ## Invariants
/// - Every accepted item passed [`validate_item`]
/// - The advance is checked against the subtotal when the order is built
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub customer_id: String,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub advance: Money,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub delivery_date: Option<DateTime<Utc>>,
}

impl OrderDraft {
    /// Starts an empty draft for a customer.
    pub fn new(customer_id: impl Into<String>) -> Self {
        OrderDraft {
            customer_id: customer_id.into(),
            ..Default::default()
        }
    }

    /// Adds a line after validating it.
    pub fn add_item(&mut self, item: OrderItem) -> CoreResult<()> {
        validate_item(&item)?;
        validate_item_count(self.items.len() + 1)?;
        self.items.push(item);
        Ok(())
    }

    /// Sets the advance taken at the counter.
    pub fn with_advance(mut self, advance: Money) -> Self {
        self.advance = advance;
        self
    }

    /// Sets the promised delivery date.
    pub fn with_delivery_date(mut self, date: DateTime<Utc>) -> Self {
        self.delivery_date = Some(date);
        self
    }

    /// Sum of line amounts.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(OrderItem::amount).sum()
    }

    /// Checks the whole draft. Drafts built with `add_item` only need the
    /// count and advance checks, but deserialized drafts need all of it.
    pub fn validate(&self) -> CoreResult<()> {
        validate_item_count(self.items.len())?;
        let mut subtotal = Money::zero();
        for item in &self.items {
            validate_item(item)?;
            subtotal = subtotal
                .checked_add(item.checked_amount()?)
                .ok_or_else(|| CoreError::invalid_argument("order subtotal is out of range"))?;
        }
        validate_advance(self.advance, subtotal)?;
        Ok(())
    }

    /// Builds the order. Status starts at `Pending`.
    pub fn into_order(
        self,
        id: impl Into<String>,
        order_number: u64,
        created_at: DateTime<Utc>,
    ) -> CoreResult<Order> {
        self.validate()?;

        let subtotal = self.subtotal();
        Ok(Order {
            id: id.into(),
            order_number,
            customer_id: self.customer_id,
            items: self.items,
            subtotal,
            advance: self.advance,
            balance: subtotal - self.advance,
            delivery_date: self.delivery_date,
            created_at,
            status: OrderStatus::Pending,
        })
    }
}

/// Checks a single line item.
///
/// ## Rules
/// - Name present, at most 200 characters
/// - Quantity 1..=999
/// - Price not negative
/// - Stitching lines name their apparel, carry only text or numeric
///   measurements, and a stitching/fabric split adds up to the unit price
pub fn validate_item(item: &OrderItem) -> CoreResult<()> {
    validate_item_name(&item.name)?;
    validate_quantity(item.quantity)?;
    validate_price(item.price)?;
    item.checked_amount()?;

    if let ItemKind::Stitching { details } = &item.kind {
        validate_apparel(&details.apparel)?;
        details.measurements.validate()?;

        if let Some(fabric) = details.fabric_price {
            validate_price(fabric)?;
            let stitching = details.stitching_price.unwrap_or(item.price - fabric);
            validate_price(stitching)?;
            if stitching + fabric != item.price {
                return Err(ValidationError::InvalidFormat {
                    field: "price split".to_string(),
                    reason: format!(
                        "stitching {} + fabric {} must equal {}",
                        stitching, fabric, item.price
                    ),
                }
                .into());
            }
        }
    }

    Ok(())
}

// =============================================================================
// Payments & Status
// =============================================================================

/// What a payment did to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentApplied {
    pub amount: Money,
    pub advance: Money,
    pub balance: Money,
}

/// Takes a payment against an order's balance.
///
/// ## Errors
/// - `Validation` when the amount is zero or negative
/// - `InvalidOrderStatus` when the order is cancelled
/// - `InvalidPaymentAmount` when the amount is more than the balance
pub fn record_payment(order: &mut Order, amount: Money) -> CoreResult<PaymentApplied> {
    validate_payment_amount(amount)?;

    if order.is_cancelled() {
        return Err(CoreError::InvalidOrderStatus {
            order_number: order.order_number,
            current_status: order.status.to_string(),
            operation: "take payment".to_string(),
        });
    }

    let balance = order.balance_due();
    if amount > balance {
        return Err(CoreError::InvalidPaymentAmount {
            reason: format!("{} is more than the balance of {}", amount, balance),
        });
    }

    order.advance += amount;
    order.balance = order.balance_due();

    Ok(PaymentApplied {
        amount,
        advance: order.advance,
        balance: order.balance,
    })
}

/// Moves an order to a new workshop status.
///
/// ## Errors
/// `InvalidOrderStatus` when the move is not allowed.
pub fn change_status(order: &mut Order, next: OrderStatus) -> CoreResult<()> {
    if !order.status.can_transition_to(next) {
        return Err(CoreError::InvalidOrderStatus {
            order_number: order.order_number,
            current_status: order.status.to_string(),
            operation: format!("move to {}", next),
        });
    }

    order.status = next;
    Ok(())
}

// =============================================================================
// Outstanding Dues
// =============================================================================

/// True when the order still has money owed on it.
pub fn is_outstanding(order: &Order) -> bool {
    !order.is_cancelled() && order.balance_due().is_positive()
}

/// Orders with money owed, earliest delivery first.
///
/// Undated orders go last; ties fall back to the order number.
pub fn outstanding_orders(orders: &[Order]) -> Vec<&Order> {
    let mut outstanding: Vec<&Order> = orders.iter().filter(|o| is_outstanding(o)).collect();
    outstanding.sort_by_key(|o| (o.delivery_date.is_none(), o.delivery_date, o.order_number));
    outstanding
}

/// Totals for the dues board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuesSummary {
    /// Sum of balances still owed.
    pub outstanding: Money,
    /// Advances already taken on those orders.
    pub advance_collected: Money,
    pub order_count: usize,
    /// Orders whose delivery date is before `today`.
    pub overdue_count: usize,
}

/// One card on the dues board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    pub label: &'static str,
    pub value: String,
}

impl DuesSummary {
    /// Summarizes the outstanding orders among `orders`.
    ///
    /// `today` is a shop-local date; delivery dates are converted with
    /// `dates` before comparing.
    pub fn from_orders(orders: &[Order], today: NaiveDate, dates: &DateFormatter) -> Self {
        let mut summary = DuesSummary {
            outstanding: Money::zero(),
            advance_collected: Money::zero(),
            order_count: 0,
            overdue_count: 0,
        };

        for order in orders.iter().filter(|o| is_outstanding(o)) {
            summary.outstanding += order.balance_due();
            summary.advance_collected += order.advance;
            summary.order_count += 1;
            if order
                .delivery_date
                .map(|d| dates.local_date(d) < today)
                .unwrap_or(false)
            {
                summary.overdue_count += 1;
            }
        }

        summary
    }

    /// Board cards, money in whole rupees.
    pub fn cards(&self) -> Vec<SummaryCard> {
        vec![
            SummaryCard {
                label: "Outstanding",
                value: self.outstanding.to_inr_whole(),
            },
            SummaryCard {
                label: "Advance Collected",
                value: self.advance_collected.to_inr_whole(),
            },
            SummaryCard {
                label: "Orders With Dues",
                value: self.order_count.to_string(),
            },
            SummaryCard {
                label: "Overdue",
                value: self.overdue_count.to_string(),
            },
        ]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Measurements, StitchingDetails};
    use chrono::TimeZone;
    use serde_json::json;

    fn shirt(price: i64, quantity: i64) -> OrderItem {
        OrderItem::stitching(
            "Shirt Stitching",
            Money::from_rupees(price),
            quantity,
            StitchingDetails {
                apparel: "Shirt".to_string(),
                measurements: Measurements::new().with("chest", "40"),
                ..Default::default()
            },
        )
    }

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, 5, 0, 0).unwrap()
    }

    fn order(number: u64, subtotal: i64, advance: i64) -> Order {
        let mut draft = OrderDraft::new("cust-1").with_advance(Money::from_rupees(advance));
        draft
            .add_item(OrderItem::stock("Suit Length", Money::from_rupees(subtotal), 1))
            .unwrap();
        draft
            .into_order(format!("ord-{}", number), number, created())
            .unwrap()
    }

    #[test]
    fn test_draft_into_order() {
        let mut draft = OrderDraft::new("cust-7").with_advance(Money::from_rupees(5000));
        draft.add_item(shirt(1500, 3)).unwrap();
        draft
            .add_item(OrderItem::fabric("Linen", Money::from_rupees(800), 5))
            .unwrap();

        let order = draft.into_order("ord-1", 1042, created()).unwrap();
        assert_eq!(order.subtotal, Money::from_rupees(8500));
        assert_eq!(order.balance, Money::from_rupees(3500));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 2);
    }

    #[test]
    fn test_draft_rejections() {
        let empty = OrderDraft::new("cust-1");
        assert!(matches!(
            empty.into_order("o", 1, created()),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let mut draft = OrderDraft::new("cust-1");
        assert!(draft.add_item(shirt(500, 0)).is_err());
        assert!(draft.add_item(shirt(500, 1000)).is_err());
        assert!(draft
            .add_item(OrderItem::stock("  ", Money::from_rupees(10), 1))
            .is_err());
        assert!(draft
            .add_item(OrderItem::stock("Tie", Money::from_paise(-1), 1))
            .is_err());
        assert!(draft.items.is_empty());

        draft.add_item(shirt(500, 1)).unwrap();
        let over = draft.with_advance(Money::from_rupees(501));
        assert!(over.into_order("o", 1, created()).is_err());
    }

    #[test]
    fn test_draft_rejects_amounts_out_of_range() {
        let mut draft = OrderDraft::new("cust-1");
        let bolt = OrderItem::stock("Bolt", Money::from_paise(i64::MAX / 2), 3);
        assert!(matches!(
            draft.add_item(bolt),
            Err(CoreError::InvalidArgument(_))
        ));

        let half = OrderItem::stock("Bolt", Money::from_paise(i64::MAX / 2 + 1), 1);
        draft.add_item(half.clone()).unwrap();
        draft.add_item(half).unwrap();
        assert!(matches!(
            draft.into_order("o", 1, created()),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_stitching_item_rules() {
        let mut no_apparel = shirt(900, 1);
        if let ItemKind::Stitching { details } = &mut no_apparel.kind {
            details.apparel.clear();
        }
        assert!(validate_item(&no_apparel).is_err());

        let nested: OrderItem = serde_json::from_value(json!({
            "name": "Kurta Stitching", "price": 90000, "quantity": 1, "type": "stitching",
            "details": { "apparel": "Kurta", "measurements": { "length": ["42"] } }
        }))
        .unwrap();
        assert!(matches!(
            validate_item(&nested),
            Err(CoreError::InvalidArgument(_))
        ));

        let split = |stitching: Option<i64>, fabric: i64| {
            OrderItem::stitching(
                "Blazer",
                Money::from_rupees(6000),
                1,
                StitchingDetails {
                    apparel: "Blazer".to_string(),
                    stitching_price: stitching.map(Money::from_rupees),
                    fabric_price: Some(Money::from_rupees(fabric)),
                    ..Default::default()
                },
            )
        };
        assert!(validate_item(&split(Some(3500), 2500)).is_ok());
        assert!(validate_item(&split(None, 2500)).is_ok());
        assert!(validate_item(&split(Some(3000), 2500)).is_err());
        assert!(validate_item(&split(None, 7000)).is_err());
    }

    #[test]
    fn test_record_payment() {
        let mut o = order(1, 8500, 5000);
        let applied = record_payment(&mut o, Money::from_rupees(2000)).unwrap();
        assert_eq!(applied.advance, Money::from_rupees(7000));
        assert_eq!(applied.balance, Money::from_rupees(1500));
        assert_eq!(o.balance, Money::from_rupees(1500));

        assert!(matches!(
            record_payment(&mut o, Money::from_rupees(1501)),
            Err(CoreError::InvalidPaymentAmount { .. })
        ));
        assert!(record_payment(&mut o, Money::zero()).is_err());

        record_payment(&mut o, Money::from_rupees(1500)).unwrap();
        assert!(o.balance.is_zero());
    }

    #[test]
    fn test_payment_on_cancelled_order() {
        let mut o = order(2, 1000, 0);
        change_status(&mut o, OrderStatus::Cancelled).unwrap();
        let err = record_payment(&mut o, Money::from_rupees(100)).unwrap_err();
        assert_eq!(err.to_string(), "Order #2 is cancelled, cannot take payment");
        assert!(o.advance.is_zero());
    }

    #[test]
    fn test_change_status() {
        let mut o = order(3, 1000, 0);
        change_status(&mut o, OrderStatus::InProgress).unwrap();
        change_status(&mut o, OrderStatus::Ready).unwrap();
        change_status(&mut o, OrderStatus::Delivered).unwrap();
        assert!(matches!(
            change_status(&mut o, OrderStatus::Cancelled),
            Err(CoreError::InvalidOrderStatus { .. })
        ));
        assert_eq!(o.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_outstanding_ordering() {
        let day = |d: u32| Some(Utc.with_ymd_and_hms(2026, 9, d, 6, 0, 0).unwrap());

        let mut a = order(10, 1000, 0);
        a.delivery_date = day(20);
        let mut b = order(11, 1000, 200);
        b.delivery_date = day(12);
        let c = order(12, 1000, 0);
        let paid = order(13, 1000, 1000);
        let mut cancelled = order(14, 1000, 0);
        cancelled.status = OrderStatus::Cancelled;
        let d = order(9, 500, 0);

        let all = vec![a, b, c, paid, cancelled, d];
        let numbers: Vec<u64> = outstanding_orders(&all)
            .iter()
            .map(|o| o.order_number)
            .collect();
        assert_eq!(numbers, vec![11, 10, 9, 12]);
    }

    #[test]
    fn test_dues_summary() {
        let mut late = order(1, 8500, 5000);
        late.delivery_date = Some(Utc.with_ymd_and_hms(2026, 9, 10, 6, 0, 0).unwrap());
        let mut upcoming = order(2, 2000, 500);
        upcoming.delivery_date = Some(Utc.with_ymd_and_hms(2026, 9, 30, 6, 0, 0).unwrap());
        let undated = order(3, 1250, 0);
        let settled = order(4, 700, 700);

        let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
        let summary = DuesSummary::from_orders(
            &[late, upcoming, undated, settled],
            today,
            &DateFormatter::ist(),
        );

        assert_eq!(summary.outstanding, Money::from_rupees(6250));
        assert_eq!(summary.advance_collected, Money::from_rupees(5500));
        assert_eq!(summary.order_count, 3);
        assert_eq!(summary.overdue_count, 1);

        let cards = summary.cards();
        assert_eq!(cards[0].value, "₹6,250");
        assert_eq!(cards[1].value, "₹5,500");
        assert_eq!(cards[3].value, "1");
    }
}
