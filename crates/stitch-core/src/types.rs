//! # Domain Types
//!
//! Core domain types used throughout Stitch Desk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   owns   ┌─────────────────┐                       │
//! │  │     Order       │ ───────► │   OrderItem     │                       │
//! │  │  ─────────────  │  (Vec)   │  ─────────────  │                       │
//! │  │  id             │          │  name           │                       │
//! │  │  order_number   │          │  price (paise)  │                       │
//! │  │  customer_id ───┼──┐       │  quantity       │                       │
//! │  │  subtotal       │  │       │  kind ──────────┼──► Stitching {details}│
//! │  │  advance        │  │       └─────────────────┘    Stock | Fabric     │
//! │  │  balance        │  │                                                 │
//! │  │  status         │  │ refers  ┌─────────────────┐                     │
//! │  └─────────────────┘  └───────► │    Customer     │  fetched separately │
//! │                                 └─────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored Shape
//! Orders use the dashboard's key names: camelCase keys, a `type` tag on
//! each item, timestamps in epoch seconds. Money fields are integer paise,
//! not the dashboard's rupee numbers, so documents are not interchangeable
//! without converting amounts.
//!
//! Item decoding is lenient: a missing or unknown `type` reads as
//! [`ItemKind::Other`], and `null` details, measurements or flags read as
//! empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Order Status
// =============================================================================

/// Where an order is in the workshop.
///
/// ## Transitions
/// ```text
/// Pending ──► InProgress ──► Ready ──► Delivered
///    │            │            │
///    └────────────┴────────────┴──────► Cancelled
/// ```
/// Orders are never deleted; cancelling is a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Taken at the counter, work not started.
    #[default]
    Pending,
    /// Being cut or stitched.
    InProgress,
    /// Finished, waiting for pickup.
    Ready,
    /// Handed over to the customer.
    Delivered,
    /// Called off.
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in workshop order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Returns the snake_case name used on the wire and in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Checks whether an order may move from `self` to `next`.
    ///
    /// Staying in the same status is allowed (idempotent updates).
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;

        if *self == next {
            return true;
        }

        match (self, next) {
            (Pending, InProgress) | (Pending, Ready) => true,
            (InProgress, Ready) => true,
            (Ready, Delivered) | (Ready, InProgress) => true,
            (Pending | InProgress | Ready, Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "in_progress" => Ok(OrderStatus::InProgress),
            "ready" => Ok(OrderStatus::Ready),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: OrderStatus::ALL.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Measurements
// =============================================================================

/// Measurement fields captured for a garment, in entry order.
///
/// Values arrive from a free-form form, so they are kept as JSON values:
/// usually text (`"38"`, `"38.5 in"`), sometimes bare numbers. Empty values
/// are stored as-is and skipped when printed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Measurements(Map<String, Value>);

impl Measurements {
    /// Creates an empty measurement set.
    pub fn new() -> Self {
        Measurements(Map::new())
    }

    /// Sets a text measurement, replacing an earlier value for the field.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), Value::String(value.into()));
    }

    /// Builder form of [`Measurements::insert`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    /// Number of recorded fields (filled or not).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no field was recorded at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw access to a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Fields with a filled-in value, in entry order, as display text.
    ///
    /// Empty strings, zero, `false` and `null` are treated as not filled.
    pub fn filled(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.0
            .iter()
            .filter(|(_, value)| is_truthy(value))
            .map(|(field, value)| (field.as_str(), display_value(value)))
    }

    /// Checks that every value is text, a number or empty.
    ///
    /// Lists and nested objects are malformed form data.
    pub fn validate(&self) -> CoreResult<()> {
        for (field, value) in &self.0 {
            match value {
                Value::String(_) | Value::Number(_) | Value::Null => {}
                other => {
                    return Err(CoreError::invalid_argument(format!(
                        "measurement '{}' must be text or a number, got {}",
                        field, other
                    )))
                }
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Measurements {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut measurements = Measurements::new();
        for (field, value) in iter {
            measurements.insert(field, value);
        }
        measurements
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// Extra detail carried by a stitching line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StitchingDetails {
    /// Garment being made ("Shirt", "Sherwani", ...).
    #[serde(default, alias = "apparelName", deserialize_with = "null_as_default")]
    pub apparel: String,

    /// Body measurements for this garment.
    #[serde(default, deserialize_with = "null_as_default")]
    pub measurements: Measurements,

    /// Customer brought their own cloth.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_own_fabric: bool,

    /// Stitching share of the unit price, when fabric was sold with it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stitching_price: Option<Money>,

    /// Fabric share of the unit price, when fabric was sold with it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fabric_price: Option<Money>,
}

/// What kind of line an item is, with the data only that kind carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    /// Tailoring service for a garment.
    Stitching {
        #[serde(default)]
        details: StitchingDetails,
    },
    /// Ready-made stock sold off the shelf.
    Stock,
    /// Cloth sold by length.
    Fabric,
    /// Anything the dashboard adds later.
    #[serde(other)]
    Other,
}

/// A line on an order. `amount` is never stored; see [`OrderItem::amount`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ItemRecord")]
pub struct OrderItem {
    /// Name printed on the invoice.
    pub name: String,

    /// Unit price.
    pub price: Money,

    /// Units ordered.
    pub quantity: i64,

    /// Item type and its details.
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl OrderItem {
    /// Creates a ready-made stock line.
    pub fn stock(name: impl Into<String>, price: Money, quantity: i64) -> Self {
        OrderItem {
            name: name.into(),
            price,
            quantity,
            kind: ItemKind::Stock,
        }
    }

    /// Creates a fabric line.
    pub fn fabric(name: impl Into<String>, price: Money, quantity: i64) -> Self {
        OrderItem {
            name: name.into(),
            price,
            quantity,
            kind: ItemKind::Fabric,
        }
    }

    /// Creates a stitching line.
    pub fn stitching(
        name: impl Into<String>,
        price: Money,
        quantity: i64,
        details: StitchingDetails,
    ) -> Self {
        OrderItem {
            name: name.into(),
            price,
            quantity,
            kind: ItemKind::Stitching { details },
        }
    }

    /// Line amount (price × quantity). Saturates on overflow; printing uses
    /// [`OrderItem::checked_amount`].
    #[inline]
    pub fn amount(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }

    /// Line amount, or `InvalidArgument` when price × quantity does not fit.
    pub fn checked_amount(&self) -> CoreResult<Money> {
        self.price
            .checked_multiply_quantity(self.quantity)
            .ok_or_else(|| {
                CoreError::invalid_argument(format!(
                    "line '{}': {} paise × {} is out of range",
                    self.name,
                    self.price.paise(),
                    self.quantity
                ))
            })
    }

    /// Stitching details, if this is a stitching line.
    pub fn stitching_details(&self) -> Option<&StitchingDetails> {
        match &self.kind {
            ItemKind::Stitching { details } => Some(details),
            _ => None,
        }
    }
}

/// An item as stored. Only `name`, `price` and `quantity` are required.
#[derive(Deserialize)]
struct ItemRecord {
    name: String,
    price: Money,
    quantity: i64,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    details: Option<Value>,
}

impl TryFrom<ItemRecord> for OrderItem {
    type Error = serde_json::Error;

    fn try_from(record: ItemRecord) -> Result<Self, Self::Error> {
        let kind = match record.kind.as_deref() {
            Some("stitching") => ItemKind::Stitching {
                details: match record.details {
                    Some(Value::Null) | None => StitchingDetails::default(),
                    Some(details) => serde_json::from_value(details)?,
                },
            },
            Some("stock") => ItemKind::Stock,
            Some("fabric") => ItemKind::Fabric,
            _ => ItemKind::Other,
        };

        Ok(OrderItem {
            name: record.name,
            price: record.price,
            quantity: record.quantity,
            kind,
        })
    }
}

/// Reads `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Order
// =============================================================================

/// A customer order, from intake to delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Document id.
    pub id: String,

    /// Sequential number printed as the invoice number.
    pub order_number: u64,

    /// Customer this order belongs to (not owned; fetched separately).
    pub customer_id: String,

    /// Line items, in the order they were entered.
    #[serde(default)]
    pub items: Vec<OrderItem>,

    /// Sum of line amounts at intake.
    pub subtotal: Money,

    /// Paid so far.
    #[serde(default)]
    pub advance: Money,

    /// Stored `subtotal - advance`.
    pub balance: Money,

    /// Promised delivery date, if agreed.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub delivery_date: Option<DateTime<Utc>>,

    /// When the order was taken.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,

    /// Workshop status.
    #[serde(default)]
    pub status: OrderStatus,
}

impl Order {
    /// Balance due as printed: `subtotal - advance`.
    ///
    /// Recomputed rather than read from `balance` so the printed figure
    /// always agrees with the two figures above it.
    #[inline]
    pub fn balance_due(&self) -> Money {
        self.subtotal - self.advance
    }

    /// Checks if the order has been cancelled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancelled
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Measurement record kept on the customer profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerMeasurements {
    /// Field-by-field record.
    Structured(Measurements),
    /// Notes typed in one box.
    FreeForm(String),
}

/// A shop customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Document id.
    pub id: String,

    /// Display name; may be blank on quick walk-in records.
    #[serde(default)]
    pub name: String,

    /// Mobile number.
    #[serde(default)]
    pub phone: String,

    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Standing measurements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurements: Option<CustomerMeasurements>,

    /// When the profile was created.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_order_status_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::InProgress));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::InProgress.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Ready));
    }

    #[test]
    fn test_order_status_parse() {
        assert_eq!("in-progress".parse::<OrderStatus>().unwrap(), OrderStatus::InProgress);
        assert_eq!("Canceled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_item_amount() {
        let item = OrderItem::stock("Cotton Shirt", Money::from_rupees(899), 3);
        assert_eq!(item.amount(), Money::from_rupees(2697));
    }

    #[test]
    fn test_stitching_item_from_json() {
        let item: OrderItem = serde_json::from_value(json!({
            "name": "Shirt Stitching",
            "price": 120000,
            "quantity": 1,
            "type": "stitching",
            "details": {
                "apparelName": "Shirt",
                "measurements": { "chest": "40", "shirtLength": "30", "cuff": "" },
                "isOwnFabric": true,
                "stitchingPrice": 70000,
                "fabricPrice": 50000
            }
        }))
        .unwrap();

        let details = item.stitching_details().expect("stitching details");
        assert_eq!(details.apparel, "Shirt");
        assert!(details.is_own_fabric);
        assert_eq!(details.fabric_price, Some(Money::from_rupees(500)));
        let keys: Vec<&str> = details.measurements.filled().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["chest", "shirtLength"]);
    }

    #[test]
    fn test_stock_item_ignores_stray_details() {
        let item: OrderItem = serde_json::from_value(json!({
            "name": "Tie",
            "price": 30000,
            "quantity": 2,
            "type": "stock",
            "details": { "sku": "TIE-01" }
        }))
        .unwrap();
        assert_eq!(item.kind, ItemKind::Stock);
        assert!(item.stitching_details().is_none());
    }

    #[test]
    fn test_unknown_item_type_is_other() {
        let item: OrderItem = serde_json::from_value(json!({
            "name": "Alteration",
            "price": 10000,
            "quantity": 1,
            "type": "alteration"
        }))
        .unwrap();
        assert_eq!(item.kind, ItemKind::Other);
    }

    #[test]
    fn test_item_without_type_is_other() {
        let item: OrderItem = serde_json::from_value(json!({
            "name": "Hemming",
            "price": 5000,
            "quantity": 1
        }))
        .unwrap();
        assert_eq!(item.kind, ItemKind::Other);

        let item: OrderItem = serde_json::from_value(json!({
            "name": "Hemming",
            "price": 5000,
            "quantity": 1,
            "type": null
        }))
        .unwrap();
        assert_eq!(item.kind, ItemKind::Other);
    }

    #[test]
    fn test_stitching_item_with_null_details() {
        let item: OrderItem = serde_json::from_value(json!({
            "name": "Kurta Stitching",
            "price": 110000,
            "quantity": 1,
            "type": "stitching",
            "details": null
        }))
        .unwrap();
        let details = item.stitching_details().expect("stitching details");
        assert!(details.measurements.is_empty());
        assert!(!details.is_own_fabric);
    }

    #[test]
    fn test_stitching_item_with_null_fields() {
        let item: OrderItem = serde_json::from_value(json!({
            "name": "Blouse Stitching",
            "price": 80000,
            "quantity": 1,
            "type": "stitching",
            "details": {
                "apparelName": null,
                "measurements": null,
                "isOwnFabric": null
            }
        }))
        .unwrap();
        let details = item.stitching_details().expect("stitching details");
        assert_eq!(details.apparel, "");
        assert!(details.measurements.is_empty());
        assert!(!details.is_own_fabric);
    }

    #[test]
    fn test_checked_amount_reports_overflow() {
        let item = OrderItem::stock("Bolt", Money::from_paise(i64::MAX / 2), 3);
        assert!(matches!(item.checked_amount(), Err(CoreError::InvalidArgument(_))));
        assert_eq!(item.amount(), Money::from_paise(i64::MAX));

        let item = OrderItem::stock("Cotton Shirt", Money::from_rupees(899), 3);
        assert_eq!(item.checked_amount().unwrap(), Money::from_rupees(2697));
    }

    #[test]
    fn test_item_serializes_type_tag() {
        let item = OrderItem::fabric("Linen", Money::from_rupees(400), 2);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "fabric");
        assert_eq!(value["price"], 40000);
    }

    #[test]
    fn test_order_timestamps_are_epoch_seconds() {
        let order: Order = serde_json::from_value(json!({
            "id": "o1",
            "orderNumber": 1042,
            "customerId": "c1",
            "items": [],
            "subtotal": 850000,
            "advance": 500000,
            "balance": 350000,
            "deliveryDate": null,
            "createdAt": 1760000000,
            "status": "in_progress"
        }))
        .unwrap();

        assert_eq!(order.created_at.timestamp(), 1_760_000_000);
        assert!(order.delivery_date.is_none());
        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(order.balance_due(), Money::from_rupees(3500));
    }

    #[test]
    fn test_measurement_truthiness() {
        let measurements: Measurements = serde_json::from_value(json!({
            "chest": "40",
            "waist": "",
            "sleeve": 0,
            "neck": 15.5,
            "hip": null
        }))
        .unwrap();

        let filled: Vec<(&str, String)> = measurements.filled().collect();
        assert_eq!(
            filled,
            vec![("chest", "40".to_string()), ("neck", "15.5".to_string())]
        );
        assert!(measurements.validate().is_ok());
    }

    #[test]
    fn test_measurement_validate_rejects_nested() {
        let measurements: Measurements =
            serde_json::from_value(json!({ "chest": ["40", "41"] })).unwrap();
        assert!(matches!(
            measurements.validate(),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_customer_measurements_untagged() {
        let structured: Customer = serde_json::from_value(json!({
            "id": "c1", "name": "Asha", "phone": "9876543210",
            "measurements": { "blouseLength": "15" }
        }))
        .unwrap();
        assert!(matches!(
            structured.measurements,
            Some(CustomerMeasurements::Structured(_))
        ));

        let free: Customer = serde_json::from_value(json!({
            "id": "c2", "name": "Ravi", "phone": "9876500000",
            "measurements": "chest 40, waist 34"
        }))
        .unwrap();
        assert!(matches!(free.measurements, Some(CustomerMeasurements::FreeForm(_))));
    }
}
