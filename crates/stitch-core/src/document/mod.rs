//! # Document Composer
//!
//! Turns an order snapshot into printable page models. No markup lives here;
//! the print desk renders these models to HTML.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Order + Customer (optional)                         │
//! │                               │                                         │
//! │             ┌─────────────────┴──────────────────┐                      │
//! │             ▼                                    ▼                      │
//! │   compose_invoice()                      compose_slips()                │
//! │   all items, 12 per page                 measured stitching, 2 per slip │
//! │             │                                    │                      │
//! │             ▼                                    ▼                      │
//! │   pages 1..N-1: "Continued"              0 items: NoMeasurements        │
//! │   page N:       totals + terms           slips 1..N-1: "Slip X of Y"    │
//! │                                          every slip: shop footer        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A missing customer is not an error; every customer field falls back to
//! `N/A` or is left out.

pub mod invoice;
pub mod slip;

use serde::{Deserialize, Serialize};

use crate::format::NOT_AVAILABLE;
use crate::types::Customer;

pub use invoice::{compose_invoice, InvoiceDocument, InvoicePage, PageClosing};
pub use slip::{compose_slips, MeasurementSlip, SlipDocument, SlipOutcome};

// =============================================================================
// Paper
// =============================================================================

/// Physical page size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaperSize {
    pub width_in: f32,
    pub height_in: f32,
    pub margin_in: f32,
}

/// Invoice paper: 5in × 8in with a quarter-inch margin.
pub const INVOICE_PAPER: PaperSize = PaperSize {
    width_in: 5.0,
    height_in: 8.0,
    margin_in: 0.25,
};

/// Measurement slip paper: 5in × 5in with a quarter-inch margin.
pub const SLIP_PAPER: PaperSize = PaperSize {
    width_in: 5.0,
    height_in: 5.0,
    margin_in: 0.25,
};

// =============================================================================
// Shop Identity
// =============================================================================

/// Who the documents come from. Loaded from the desk configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ShopIdentity {
    /// Shop name in the header.
    pub name: String,

    /// Line under the name ("Bespoke Tailoring & Alterations").
    #[serde(default)]
    pub tagline: Option<String>,

    /// Postal address, one line per entry.
    #[serde(default)]
    pub address_lines: Vec<String>,

    /// Counter phone.
    #[serde(default)]
    pub phone: Option<String>,

    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,

    /// Terms printed under the invoice totals.
    #[serde(default)]
    pub terms: Vec<String>,
}

impl Default for ShopIdentity {
    fn default() -> Self {
        ShopIdentity {
            name: "Stitch Desk Tailors".to_string(),
            tagline: Some("Bespoke Tailoring & Alterations".to_string()),
            address_lines: vec![
                "12 Market Road".to_string(),
                "Pune, Maharashtra 411001".to_string(),
            ],
            phone: Some("+91 98765 43210".to_string()),
            email: None,
            terms: vec![
                "Goods once sold will not be taken back.".to_string(),
                "Please bring this invoice at the time of delivery.".to_string(),
                "Garments not collected within 30 days are at the owner's risk.".to_string(),
            ],
        }
    }
}

impl ShopIdentity {
    /// The contact block printed at the foot of each measurement slip.
    pub fn contact(&self) -> ShopContact {
        ShopContact {
            name: self.name.clone(),
            address_lines: self.address_lines.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }
}

/// Shop contact details for document footers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopContact {
    pub name: String,
    pub address_lines: Vec<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

// =============================================================================
// Bill To
// =============================================================================

/// Customer block on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillTo {
    /// Customer name or `N/A`.
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl BillTo {
    /// Builds the block from an optional customer record.
    pub fn from_customer(customer: Option<&Customer>) -> Self {
        BillTo {
            name: display_name(customer),
            phone: customer.and_then(|c| non_blank(&c.phone)),
            email: customer.and_then(|c| c.email.as_deref().and_then(non_blank)),
        }
    }
}

/// Customer name for print, `N/A` when the record or the name is missing.
pub(crate) fn display_name(customer: Option<&Customer>) -> String {
    customer
        .and_then(|c| non_blank(&c.name))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_to_missing_customer() {
        let bill_to = BillTo::from_customer(None);
        assert_eq!(bill_to.name, "N/A");
        assert!(bill_to.phone.is_none());
        assert!(bill_to.email.is_none());
    }

    #[test]
    fn test_bill_to_blank_name() {
        let customer = Customer {
            id: "c1".to_string(),
            name: "   ".to_string(),
            phone: "9876543210".to_string(),
            email: Some(String::new()),
            measurements: None,
            created_at: None,
        };
        let bill_to = BillTo::from_customer(Some(&customer));
        assert_eq!(bill_to.name, "N/A");
        assert_eq!(bill_to.phone.as_deref(), Some("9876543210"));
        assert!(bill_to.email.is_none());
    }
}
