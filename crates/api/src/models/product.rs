//! Catalog domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kirana_core::{Money, ProductId, UserId};

/// A catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Money,
    /// Pre-discount display price, when the product is on offer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Remaining stock. Zero means not purchasable; still listed.
    pub stock_count: i32,
    /// Administrator who created the product.
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether new cart additions / orders may reference this product.
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        self.stock_count > 0
    }
}

/// Admin create/update payload for a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Money,
    #[serde(default)]
    pub original_price: Option<Money>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub stock_count: i32,
}
