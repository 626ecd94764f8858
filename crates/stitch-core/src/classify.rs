//! # Item Classifier
//!
//! Decides which line items carry tailoring detail worth printing.
//!
//! ```text
//! ItemKind::Stitching { details } ──┬── measurements non-empty ──► measurement slip
//!                                   └── fabric_price > 0 ────────► price split on invoice
//! ItemKind::Stock | Fabric | Other ─────────────────────────────► neither
//! ```

use crate::types::{ItemKind, OrderItem};

/// True iff the item is a stitching line with at least one measurement field.
pub fn is_stitching_with_measurements(item: &OrderItem) -> bool {
    match &item.kind {
        ItemKind::Stitching { details } => !details.measurements.is_empty(),
        ItemKind::Stock | ItemKind::Fabric | ItemKind::Other => false,
    }
}

/// True iff the item is a stitching line that sold fabric alongside it.
pub fn is_stitching_with_fabric_split(item: &OrderItem) -> bool {
    match &item.kind {
        ItemKind::Stitching { details } => details
            .fabric_price
            .map(|fabric| fabric.is_positive())
            .unwrap_or(false),
        ItemKind::Stock | ItemKind::Fabric | ItemKind::Other => false,
    }
}

/// The stitching lines that belong on measurement slips, in order.
pub fn measured_items(items: &[OrderItem]) -> Vec<&OrderItem> {
    items
        .iter()
        .filter(|item| is_stitching_with_measurements(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{Measurements, StitchingDetails};

    fn stitching(measurements: Measurements, fabric_price: Option<Money>) -> OrderItem {
        OrderItem::stitching(
            "Kurta Stitching",
            Money::from_rupees(900),
            1,
            StitchingDetails {
                apparel: "Kurta".to_string(),
                measurements,
                fabric_price,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_measurements_required() {
        let with = stitching(Measurements::new().with("chest", "40"), None);
        let without = stitching(Measurements::new(), None);
        let stock = OrderItem::stock("Belt", Money::from_rupees(300), 1);

        assert!(is_stitching_with_measurements(&with));
        assert!(!is_stitching_with_measurements(&without));
        assert!(!is_stitching_with_measurements(&stock));
    }

    #[test]
    fn test_fabric_split() {
        let split = stitching(Measurements::new(), Some(Money::from_rupees(400)));
        let zero = stitching(Measurements::new(), Some(Money::zero()));
        let none = stitching(Measurements::new(), None);
        let fabric = OrderItem::fabric("Silk", Money::from_rupees(700), 2);

        assert!(is_stitching_with_fabric_split(&split));
        assert!(!is_stitching_with_fabric_split(&zero));
        assert!(!is_stitching_with_fabric_split(&none));
        assert!(!is_stitching_with_fabric_split(&fabric));
    }

    #[test]
    fn test_measured_items_keeps_order() {
        let items = vec![
            stitching(Measurements::new().with("chest", "40"), None),
            OrderItem::stock("Tie", Money::from_rupees(250), 1),
            stitching(Measurements::new(), None),
            stitching(Measurements::new().with("waist", "32"), None),
        ];
        let measured = measured_items(&items);
        assert_eq!(measured.len(), 2);
        assert!(std::ptr::eq(measured[0], &items[0]));
        assert!(std::ptr::eq(measured[1], &items[3]));
    }
}
