//! Cart line items and merge semantics.
//!
//! A cart is a list of denormalized line items: each line copies the catalog
//! name, price, and image at the moment the product was added, so later
//! catalog edits never rewrite a cart. Lines keep insertion order; adding a
//! product already in the cart merges quantities instead of appending.

pub mod store;

use serde::{Deserialize, Serialize};

use crate::types::{Money, ProductId};

pub use store::{CartStorage, CartStorageError, CartStore, CartSummary, InMemoryStorage};

/// Catalog fields copied into a new cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSnapshot {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    /// Pre-discount catalog price, when the product is on offer.
    pub original_price: Option<Money>,
    pub image_url: Option<String>,
}

/// One cart entry: a product snapshot plus a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    /// Price of the whole line (`unit_price × quantity`).
    #[must_use]
    pub fn line_price(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    /// Amount saved against the original price, if one is present.
    #[must_use]
    pub fn line_savings(&self) -> Money {
        self.original_price
            .map_or(Money::ZERO, |original| {
                (original - self.unit_price).times(self.quantity)
            })
    }
}

/// Computed cart totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// `Σ unit_price × quantity` over all lines.
    pub subtotal: Money,
    /// `Σ (original_price − unit_price) × quantity` over discounted lines.
    pub savings: Money,
}

/// An owned cart: ordered line items keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from a stored line list.
    ///
    /// Lines with a zero quantity (possible in data written by older
    /// clients) are bumped to the minimum of 1.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let lines = lines
            .into_iter()
            .map(|mut line| {
                line.quantity = line.quantity.max(1);
                line
            })
            .collect();
        Self { lines }
    }

    /// Add `quantity` of a product.
    ///
    /// If a line with the same product id exists its quantity is
    /// incremented; otherwise a new line is appended from the snapshot.
    /// A zero `quantity` counts as 1.
    pub fn add(&mut self, snapshot: LineSnapshot, quantity: u32) {
        let quantity = quantity.max(1);
        match self
            .lines
            .iter_mut()
            .find(|line| line.product_id == snapshot.product_id)
        {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(CartLine {
                product_id: snapshot.product_id,
                name: snapshot.name,
                unit_price: snapshot.unit_price,
                original_price: snapshot.original_price,
                image_url: snapshot.image_url,
                quantity,
            }),
        }
    }

    /// Remove a product's line. Absent ids are a no-op.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Set a line's quantity, clamped to a minimum of 1.
    ///
    /// Live stock is not consulted; the UI cap is advisory only. Setting a
    /// quantity for a product not in the cart is a no-op.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = quantity.max(1);
        }
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Compute subtotal and savings over the current lines.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            subtotal: self.lines.iter().map(CartLine::line_price).sum(),
            savings: self.lines.iter().map(CartLine::line_savings).sum(),
        }
    }

    /// Total unit count across all lines (badge counters).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// The current line items, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// True if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
