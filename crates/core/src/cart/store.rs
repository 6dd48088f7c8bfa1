//! Owned, observable cart store.
//!
//! [`CartStore`] is the single holder of a user's cart on a device. Every
//! mutation writes the full line list through the injected [`CartStorage`]
//! (the durable per-user slot) and publishes a [`CartSummary`] on a watch
//! channel so badge counters and other views can re-render without any
//! ambient global state.
//!
//! Whole-cart sync with the account mirror is last-writer-wins: `lines()`
//! feeds a push (local overwrites remote), [`CartStore::replace_all`]
//! applies a pull (remote overwrites local). The HTTP transport lives with
//! the caller; the store only deals in line lists.

use tokio::sync::watch;

use super::{Cart, CartLine, CartTotals, LineSnapshot};
use crate::types::{Money, ProductId};

/// Error from the durable cart slot.
#[derive(Debug, thiserror::Error)]
#[error("cart storage failed: {reason}")]
pub struct CartStorageError {
    pub reason: String,
}

impl CartStorageError {
    /// Create an error with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Durable per-user storage for the full cart line list.
///
/// Implementations are expected to overwrite the slot wholesale on every
/// save; there is no partial update.
pub trait CartStorage {
    /// Load the stored line list. An empty slot yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError`] if the slot cannot be read.
    fn load(&self) -> Result<Vec<CartLine>, CartStorageError>;

    /// Overwrite the slot with the given line list.
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError`] if the slot cannot be written.
    fn save(&mut self, lines: &[CartLine]) -> Result<(), CartStorageError>;
}

/// Snapshot published to subscribers after every cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    /// Total unit count across all lines.
    pub item_count: u32,
    /// `Σ unit_price × quantity`.
    pub subtotal: Money,
}

/// The owned cart store: cart + durable slot + change channel.
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
    changes: watch::Sender<CartSummary>,
}

impl<S: CartStorage> CartStore<S> {
    /// Open a store over a durable slot, loading whatever it holds.
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError`] if the slot cannot be read.
    pub fn open(storage: S) -> Result<Self, CartStorageError> {
        let cart = Cart::from_lines(storage.load()?);
        let (changes, _) = watch::channel(summarize(&cart));
        Ok(Self {
            cart,
            storage,
            changes,
        })
    }

    /// Subscribe to cart changes. The receiver always holds the latest
    /// summary; slow consumers only ever see the most recent state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.changes.subscribe()
    }

    /// Add `quantity` of a product, merging into an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError`] if persisting the cart fails.
    pub fn add(&mut self, snapshot: LineSnapshot, quantity: u32) -> Result<(), CartStorageError> {
        self.cart.add(snapshot, quantity);
        self.commit()
    }

    /// Remove a product's line.
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError`] if persisting the cart fails.
    pub fn remove(&mut self, product_id: ProductId) -> Result<(), CartStorageError> {
        self.cart.remove(product_id);
        self.commit()
    }

    /// Set a line's quantity (clamped to 1).
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError`] if persisting the cart fails.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), CartStorageError> {
        self.cart.set_quantity(product_id, quantity);
        self.commit()
    }

    /// Drop every line (checkout post-condition).
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError`] if persisting the cart fails.
    pub fn clear(&mut self) -> Result<(), CartStorageError> {
        self.cart.clear();
        self.commit()
    }

    /// Overwrite the local cart with a pulled mirror (remote wins).
    ///
    /// # Errors
    ///
    /// Returns [`CartStorageError`] if persisting the cart fails.
    pub fn replace_all(&mut self, lines: Vec<CartLine>) -> Result<(), CartStorageError> {
        self.cart = Cart::from_lines(lines);
        self.commit()
    }

    /// The current line items (what a push sends to the mirror).
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Computed totals over the current lines.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    /// True if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    fn commit(&mut self) -> Result<(), CartStorageError> {
        self.storage.save(self.cart.lines())?;
        self.changes.send_replace(summarize(&self.cart));
        Ok(())
    }
}

fn summarize(cart: &Cart) -> CartSummary {
    CartSummary {
        item_count: cart.item_count(),
        subtotal: cart.totals().subtotal,
    }
}

/// Cart storage held in process memory.
///
/// Useful in tests and in clients that defer durability to the account
/// mirror.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStorage {
    lines: Vec<CartLine>,
}

impl InMemoryStorage {
    /// An empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-seeded with lines.
    #[must_use]
    pub fn with_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }
}

impl CartStorage for InMemoryStorage {
    fn load(&self) -> Result<Vec<CartLine>, CartStorageError> {
        Ok(self.lines.clone())
    }

    fn save(&mut self, lines: &[CartLine]) -> Result<(), CartStorageError> {
        self.lines = lines.to_vec();
        Ok(())
    }
}
