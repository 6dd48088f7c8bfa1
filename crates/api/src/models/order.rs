//! Order domain types.
//!
//! An order's line items are immutable copies of cart lines taken at
//! checkout. They reference the product for bookkeeping but are never
//! re-read from the catalog, so later product edits and deletes cannot
//! rewrite purchase history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kirana_core::{Money, OrderId, ProductId, UserId};

/// One frozen order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub quantity: u32,
}

impl OrderLine {
    /// Price of the whole line.
    #[must_use]
    pub fn line_price(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// Shipping destination captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Whatever the payment gateway echoed back at pay time.
///
/// Stored verbatim and never verified; the pay transition is trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub line_items: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: Money,
    pub tax_price: Money,
    pub shipping_price: Money,
    pub total_price: Money,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResult>,
    pub is_delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Everything the repository needs to insert an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub line_items: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: Money,
    pub tax_price: Money,
    pub shipping_price: Money,
    pub total_price: Money,
}
