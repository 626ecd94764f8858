//! # Invoice Composer
//!
//! Lays an order out on 5in × 8in invoice pages, twelve lines per page.
//!
//! ## Page Anatomy
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────┐
//! │ Shop name        INVOICE     │   │ Shop name        INVOICE     │
//! │ address          #1042       │   │ address          #1042       │
//! │ Bill To: Asha    19 Oct 2026 │   │ Bill To: Asha    19 Oct 2026 │
//! │ ──────────────────────────── │   │ ──────────────────────────── │
//! │ 12 line items                │   │ 1 line item                  │
//! │                              │   │ ──────────────────────────── │
//! │                              │   │ Subtotal        ₹8,500.00    │
//! │                              │   │ Advance        -₹5,000.00    │
//! │ Continued on next page       │   │ Balance Due     ₹3,500.00    │
//! │ (Page 1 of 2)                │   │ Terms & Conditions ...       │
//! └──────────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! Totals and terms appear on exactly one page, the last. An order with no
//! lines still gets that one page so the totals are never lost.

use serde::Serialize;

use crate::classify::is_stitching_with_fabric_split;
use crate::document::{BillTo, ShopIdentity};
use crate::error::{CoreError, CoreResult};
use crate::format::DateFormatter;
use crate::money::Money;
use crate::paginate::paginate;
use crate::types::{Customer, Order, OrderItem};
use crate::INVOICE_PAGE_SIZE;

// =============================================================================
// Page Model
// =============================================================================

/// A composed invoice, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDocument {
    /// Order the invoice was composed from.
    pub order_id: String,

    /// Shop identity for the page header.
    pub shop: ShopIdentity,

    /// Pages in print order; never empty.
    pub pages: Vec<InvoicePage>,
}

impl InvoiceDocument {
    /// Number of printed pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The totals block, taken from the last page.
    pub fn totals(&self) -> Option<&InvoiceTotals> {
        self.pages.last().and_then(|page| match &page.closing {
            PageClosing::Totals { totals, .. } => Some(totals),
            PageClosing::Continued { .. } => None,
        })
    }
}

/// One printed invoice page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoicePage {
    /// 1-based page number.
    pub number: usize,

    /// Total pages in the invoice.
    pub count: usize,

    /// Invoice number, date and bill-to block (repeated on every page).
    pub header: InvoiceHeader,

    /// This page's lines only.
    pub lines: Vec<InvoiceLine>,

    /// Totals on the last page, a continuation marker elsewhere.
    pub closing: PageClosing,
}

impl InvoicePage {
    /// True for the page that carries totals and terms.
    pub fn is_last(&self) -> bool {
        self.number == self.count
    }
}

/// Header repeated on each page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceHeader {
    /// Order number, printed as the invoice number.
    pub invoice_number: u64,

    /// Order creation date.
    pub date: String,

    pub bill_to: BillTo,
}

/// A priced line on the invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLine {
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    /// `unit_price × quantity`.
    pub amount: Money,
    /// Stitching / fabric breakdown shown under the name.
    pub split: Option<PriceSplit>,
}

/// How a stitching line's unit price divides between labour and cloth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceSplit {
    pub stitching: Money,
    pub fabric: Money,
}

/// What closes a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageClosing {
    /// Last page: totals and terms.
    Totals {
        totals: InvoiceTotals,
        terms: InvoiceTerms,
    },
    /// Any other page.
    Continued { page: usize, of: usize },
}

impl PageClosing {
    /// The continuation line, if this page continues.
    pub fn marker(&self) -> Option<String> {
        match self {
            PageClosing::Continued { page, of } => Some(format!(
                "Continued on next page (Page {} of {})",
                page, of
            )),
            PageClosing::Totals { .. } => None,
        }
    }
}

/// Money summary on the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    /// Printed as a deduction.
    pub advance: Money,
    /// `subtotal - advance`.
    pub balance_due: Money,
}

/// Terms block on the last page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceTerms {
    /// Formatted delivery date; the line is left out when `None`.
    pub expected_delivery: Option<String>,
    pub conditions: Vec<String>,
}

// =============================================================================
// Composer
// =============================================================================

/// Composes the invoice for an order.
///
/// ## Arguments
/// * `order` - Loaded order snapshot
/// * `customer` - The order's customer, `None` if it could not be found
/// * `shop` - Shop identity for the header and terms
/// * `dates` - Local date formatter
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use stitch_core::document::{compose_invoice, ShopIdentity};
/// use stitch_core::format::DateFormatter;
/// use stitch_core::{Money, Order, OrderItem, OrderStatus};
///
/// let order = Order {
///     id: "o1".into(),
///     order_number: 7,
///     customer_id: "c1".into(),
///     items: (0..13)
///         .map(|i| OrderItem::stock(format!("Item {i}"), Money::from_rupees(100), 1))
///         .collect(),
///     subtotal: Money::from_rupees(1300),
///     advance: Money::from_rupees(300),
///     balance: Money::from_rupees(1000),
///     delivery_date: None,
///     created_at: Utc::now(),
///     status: OrderStatus::Pending,
/// };
///
/// let invoice =
///     compose_invoice(&order, None, &ShopIdentity::default(), &DateFormatter::ist()).unwrap();
/// assert_eq!(invoice.page_count(), 2);
/// assert!(invoice.pages[0].closing.marker().is_some());
/// assert_eq!(invoice.totals().unwrap().balance_due, Money::from_rupees(1000));
/// ```
pub fn compose_invoice(
    order: &Order,
    customer: Option<&Customer>,
    shop: &ShopIdentity,
    dates: &DateFormatter,
) -> CoreResult<InvoiceDocument> {
    let mut chunks = paginate(&order.items, INVOICE_PAGE_SIZE)?;
    if chunks.is_empty() {
        chunks.push(&[]);
    }

    let header = InvoiceHeader {
        invoice_number: order.order_number,
        date: dates.format(order.created_at),
        bill_to: BillTo::from_customer(customer),
    };

    let count = chunks.len();
    let mut pages = Vec::with_capacity(count);
    for (index, items) in chunks.into_iter().enumerate() {
        let number = index + 1;
        let closing = if number == count {
            PageClosing::Totals {
                totals: totals_for(order)?,
                terms: InvoiceTerms {
                    expected_delivery: order.delivery_date.map(|at| dates.format(at)),
                    conditions: shop.terms.clone(),
                },
            }
        } else {
            PageClosing::Continued {
                page: number,
                of: count,
            }
        };

        pages.push(InvoicePage {
            number,
            count,
            header: header.clone(),
            lines: items.iter().map(invoice_line).collect::<CoreResult<_>>()?,
            closing,
        });
    }

    Ok(InvoiceDocument {
        order_id: order.id.clone(),
        shop: shop.clone(),
        pages,
    })
}

fn totals_for(order: &Order) -> CoreResult<InvoiceTotals> {
    let balance_due = order.subtotal.checked_sub(order.advance).ok_or_else(|| {
        CoreError::invalid_argument(format!("order {}: balance is out of range", order.id))
    })?;

    Ok(InvoiceTotals {
        subtotal: order.subtotal,
        advance: order.advance,
        balance_due,
    })
}

fn invoice_line(item: &OrderItem) -> CoreResult<InvoiceLine> {
    let split = if is_stitching_with_fabric_split(item) {
        item.stitching_details().map(|details| {
            let fabric = details.fabric_price.unwrap_or_default();
            PriceSplit {
                stitching: details.stitching_price.unwrap_or(item.price - fabric),
                fabric,
            }
        })
    } else {
        None
    };

    Ok(InvoiceLine {
        name: item.name.clone(),
        unit_price: item.price,
        quantity: item.quantity,
        amount: item.checked_amount()?,
        split,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
