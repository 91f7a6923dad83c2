use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::Product;

/// Order lifecycle. `InCart` is special: the single order in this status is
/// the shopper's editable basket. Every other status is reached from
/// `InCart` exactly once and never goes back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    InCart,
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// One line of an order: a product snapshot plus a positive quantity.
/// A product id appears at most once per order; quantity changes update the
/// existing line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub product: Product,
    pub quantity: u32,
}

impl LineItem {
    pub fn line_total_cents(&self) -> i64 {
        self.product.price_cents * self.quantity as i64
    }
}

/// Shipping details attached when an order leaves the cart through the
/// payment-return flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingAddress {
    pub full_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub items: Vec<LineItem>,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl Order {
    /// A fresh, empty cart order. Orders are only ever created this way;
    /// every other status is reached by mutating an existing order.
    pub fn new_cart() -> Self {
        Self {
            id: generate_order_id(),
            items: Vec::new(),
            total_cents: 0,
            status: OrderStatus::InCart,
            created_at: Utc::now(),
            shipping_address: None,
            payment_method: None,
        }
    }

    pub fn is_cart(&self) -> bool {
        self.status == OrderStatus::InCart
    }

    /// `total_cents` is a cached derivation of `items`; call after every
    /// items mutation.
    pub fn recompute_total(&mut self) {
        self.total_cents = self.items.iter().map(LineItem::line_total_cents).sum();
    }
}

/// Opaque order identifier: unix milliseconds plus a random suffix, e.g.
/// `ORD-1722854400123-9f3c2a1b4`. Collisions are below the floor worth
/// handling for a single shopper's collection.
pub fn generate_order_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD-{}-{}", millis, &suffix[..9])
}
