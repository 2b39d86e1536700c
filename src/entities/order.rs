//! Order record and its lifecycle status

use crate::core::{Entity, FieldValue, ValidationError};
use crate::entities::millis_to_datetime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an order
///
/// The set is closed: a label outside it is rejected both when parsing
/// user input and when deserializing backend payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "Order Placed")]
    OrderPlaced,
    #[serde(rename = "Packing")]
    Packing,
    #[serde(rename = "Shipped")]
    Shipped,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    #[serde(rename = "Delivered")]
    Delivered,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::OrderPlaced,
        OrderStatus::Packing,
        OrderStatus::Shipped,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Label used by the backend and shown to staff
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::OrderPlaced => "Order Placed",
            OrderStatus::Packing => "Packing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether the order has reached a final state
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| ValidationError::UnknownStatus {
                value: s.to_string(),
            })
    }
}

/// Shipping address attached to an order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub county: String,
    pub postcode: String,
    pub country: String,
}

impl Address {
    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A line item referencing a product by id only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,

    #[serde(default)]
    pub size: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    pub quantity: u32,

    /// Unit price at the time of purchase
    pub price: f64,
}

impl LineItem {
    pub fn total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// A customer order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub user_id: String,

    pub products: Vec<LineItem>,

    pub amount: f64,

    #[serde(default)]
    pub address: Address,

    pub status: OrderStatus,

    #[serde(default)]
    pub payment_method: String,

    /// Whether payment has been received
    #[serde(default)]
    pub payment: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_method: Option<String>,

    /// Placement time in milliseconds since the epoch
    pub date: i64,
}

impl Order {
    /// Ids of all products referenced by this order's line items
    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.products
            .iter()
            .map(|item| item.product_id.as_str())
            .filter(|id| !id.is_empty())
    }
}

impl Entity for Order {
    fn resource_label() -> &'static str {
        "Order"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "_id" | "id" => Some(FieldValue::from(self.id.as_str())),
            "status" => Some(FieldValue::from(self.status.label())),
            "amount" => Some(FieldValue::Float(self.amount)),
            "date" => Some(
                millis_to_datetime(self.date)
                    .map(FieldValue::DateTime)
                    .unwrap_or(FieldValue::Null),
            ),
            "customer" => Some(FieldValue::from(self.address.full_name())),
            "city" => Some(FieldValue::from(self.address.city.as_str())),
            "payment" => Some(FieldValue::Boolean(self.payment)),
            "paymentMethod" => Some(FieldValue::from(self.payment_method.as_str())),
            _ => None,
        }
    }
}
