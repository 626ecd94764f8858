//! # Measurement Slip Composer
//!
//! Prints the measurements of stitching lines on 5in × 5in slips, two
//! garments per slip, for the cutting table.
//!
//! Unlike the invoice, the shop footer is on every slip, and an order with
//! nothing to measure produces no slips at all.

use serde::Serialize;

use crate::classify::measured_items;
use crate::document::{display_name, non_blank, ShopContact, ShopIdentity};
use crate::error::CoreResult;
use crate::format::{humanize_key, DateFormatter};
use crate::paginate::paginate;
use crate::types::{Customer, Order, OrderItem};
use crate::SLIP_PAGE_SIZE;

/// Title printed at the top of each slip.
pub const SLIP_TITLE: &str = "Measurement Slip";

/// Badge for garments made from the customer's cloth.
pub const OWN_FABRIC_BADGE: &str = "Customer's Own Fabric";

/// Heading of the terminal state for orders without measurements.
pub const NO_MEASUREMENTS_TITLE: &str = "No Measurements";

/// Body of the terminal state for orders without measurements.
pub const NO_MEASUREMENTS_MESSAGE: &str =
    "This order has no stitching items with recorded measurements.";

// =============================================================================
// Slip Model
// =============================================================================

/// Result of composing slips for an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlipOutcome {
    /// Nothing to measure; show the terminal message and do not print.
    NoMeasurements,
    /// Slips to print.
    Slips(SlipDocument),
}

/// Composed measurement slips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlipDocument {
    pub order_id: String,
    /// Never empty.
    pub slips: Vec<MeasurementSlip>,
}

impl SlipDocument {
    /// Number of printed slips.
    pub fn slip_count(&self) -> usize {
        self.slips.len()
    }
}

/// One printed slip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementSlip {
    /// 1-based slip number.
    pub number: usize,
    pub count: usize,
    pub order_number: u64,
    /// Order creation date.
    pub date: String,
    pub customer: SlipCustomer,
    pub entries: Vec<SlipEntry>,
    /// Shop contact, identical on every slip.
    pub footer: ShopContact,
}

impl MeasurementSlip {
    /// `Slip X of Y` on every slip but the last.
    pub fn marker(&self) -> Option<String> {
        if self.number < self.count {
            Some(format!("Slip {} of {}", self.number, self.count))
        } else {
            None
        }
    }
}

/// Customer block on a slip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlipCustomer {
    /// Name or `N/A`.
    pub name: String,
    /// Formatted delivery date or `N/A`.
    pub delivery_date: String,
    pub phone: Option<String>,
}

/// One garment on a slip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlipEntry {
    pub apparel: String,
    pub quantity: i64,
    /// Filled-in measurements only, in entry order.
    pub measurements: Vec<MeasurementLine>,
    /// Show the own-fabric badge.
    pub own_fabric: bool,
}

/// A labelled measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeasurementLine {
    /// Humanized field name (`shirt Length`).
    pub label: String,
    pub value: String,
}

// =============================================================================
// Composer
// =============================================================================

/// Composes measurement slips for an order.
///
/// ## Returns
/// * `SlipOutcome::NoMeasurements` - no stitching line has measurements; the
///   paginator is not called
/// * `SlipOutcome::Slips` - two garments per slip
///
/// ## Errors
/// `InvalidArgument` when a measurement value is a list or nested object.
pub fn compose_slips(
    order: &Order,
    customer: Option<&Customer>,
    shop: &ShopIdentity,
    dates: &DateFormatter,
) -> CoreResult<SlipOutcome> {
    let measured = measured_items(&order.items);
    if measured.is_empty() {
        return Ok(SlipOutcome::NoMeasurements);
    }

    let entries = measured
        .into_iter()
        .map(slip_entry)
        .collect::<CoreResult<Vec<_>>>()?;

    let slip_customer = SlipCustomer {
        name: display_name(customer),
        delivery_date: dates.format_or_na(order.delivery_date),
        phone: customer.and_then(|c| non_blank(&c.phone)),
    };
    let date = dates.format(order.created_at);
    let footer = shop.contact();

    let chunks = paginate(&entries, SLIP_PAGE_SIZE)?;
    let count = chunks.len();
    let slips = chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| MeasurementSlip {
            number: index + 1,
            count,
            order_number: order.order_number,
            date: date.clone(),
            customer: slip_customer.clone(),
            entries: chunk.to_vec(),
            footer: footer.clone(),
        })
        .collect();

    Ok(SlipOutcome::Slips(SlipDocument {
        order_id: order.id.clone(),
        slips,
    }))
}

fn slip_entry(item: &OrderItem) -> CoreResult<SlipEntry> {
    let (apparel, measurements, own_fabric) = match item.stitching_details() {
        Some(details) => {
            details.measurements.validate()?;
            let lines = details
                .measurements
                .filled()
                .map(|(field, value)| MeasurementLine {
                    label: humanize_key(field),
                    value,
                })
                .collect();
            let apparel = non_blank(&details.apparel).unwrap_or_else(|| item.name.clone());
            (apparel, lines, details.is_own_fabric)
        }
        None => (item.name.clone(), Vec::new(), false),
    };

    Ok(SlipEntry {
        apparel,
        quantity: item.quantity,
        measurements,
        own_fabric,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
