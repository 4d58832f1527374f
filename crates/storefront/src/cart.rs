//! Cart store and read-time reconciliation against the catalog.
//!
//! The cart keeps one [`CartLine`] per product. Each line remembers the name
//! and price seen when it was added so it can be shown before the catalog
//! has loaded; [`CartStore::reconcile`] swaps those for current catalog
//! values when the cart is read for display or checkout.
//!
//! Lines whose product has disappeared from the catalog (dangling lines) are
//! left out of the reconciled view and its totals but stay in the store
//! until the user removes them. A transient fetch that comes back short must
//! not cost the user their cart.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopfront_core::{Money, ProductId};

use crate::api::CatalogItem;
use crate::catalog::CatalogSnapshot;

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Quantity must be at least 1")]
    ZeroQuantity,

    #[error("Quantity for product {0} is too large")]
    QuantityOverflow(ProductId),

    #[error("Product {0} is currently unavailable")]
    Unavailable(ProductId),
}

/// One product the user intends to buy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item_id: ProductId,
    pub quantity: u32,
    /// Name when the line was created.
    pub name: String,
    /// Price when the line was created.
    pub unit_price: Money,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

impl CartLine {
    fn snapshot_of(item: &CatalogItem, quantity: u32) -> Self {
        Self {
            item_id: item.id,
            quantity,
            name: item.name.clone(),
            unit_price: item.unit_price(),
            category: item.category.clone(),
            brand: item.brand.clone(),
        }
    }
}

/// The cart aggregate. Lines keep the order they were first added in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl From<Vec<CartLine>> for CartStore {
    /// Rebuild a cart from its persisted lines.
    ///
    /// Duplicate ids are merged by summing (saturating) and zero-quantity
    /// lines are dropped, so a hand-edited document still yields a valid cart.
    fn from(persisted: Vec<CartLine>) -> Self {
        let mut cart = Self::default();
        for line in persisted {
            if line.quantity == 0 {
                continue;
            }
            match cart.line_mut(line.item_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }
}

impl From<CartStore> for Vec<CartLine> {
    fn from(cart: CartStore) -> Self {
        cart.lines
    }
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.lines.iter().position(|line| line.item_id == id)
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.item_id == id)
    }

    /// Add `delta` units of `item`, merging into an existing line.
    ///
    /// Returns the line's quantity after the call.
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroQuantity`] if `delta` is 0
    /// - [`CartError::Unavailable`] if the catalog marks the item unavailable
    /// - [`CartError::QuantityOverflow`] if the new quantity would not fit
    pub fn add(&mut self, item: &CatalogItem, delta: u32) -> Result<u32, CartError> {
        if delta == 0 {
            return Err(CartError::ZeroQuantity);
        }
        if !item.available {
            return Err(CartError::Unavailable(item.id));
        }

        match self.line_mut(item.id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(delta)
                    .ok_or(CartError::QuantityOverflow(item.id))?;
                Ok(line.quantity)
            }
            None => {
                self.lines.push(CartLine::snapshot_of(item, delta));
                Ok(delta)
            }
        }
    }

    /// Set a line's quantity. Zero or negative removes the line.
    ///
    /// Returns whether a line was changed or removed; absent ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] if `quantity` does not fit a
    /// line quantity. The line is left as it was.
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) -> Result<bool, CartError> {
        if quantity <= 0 {
            return Ok(self.remove(id));
        }
        let Some(line) = self.line_mut(id) else {
            return Ok(false);
        };
        line.quantity = u32::try_from(quantity).map_err(|_| CartError::QuantityOverflow(id))?;
        Ok(true)
    }

    /// Stepper "+". No-op on absent ids.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] at `u32::MAX`.
    pub fn increment(&mut self, id: ProductId) -> Result<bool, CartError> {
        let Some(line) = self.line_mut(id) else {
            return Ok(false);
        };
        line.quantity = line
            .quantity
            .checked_add(1)
            .ok_or(CartError::QuantityOverflow(id))?;
        Ok(true)
    }

    /// Stepper "-". Clamps at 1; use [`Self::remove`] to delete a line.
    pub fn decrement(&mut self, id: ProductId) -> bool {
        match self.line_mut(id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_sub(1).max(1);
                true
            }
            None => false,
        }
    }

    /// Delete a line if present. Returns whether anything was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        match self.position(id) {
            Some(i) => {
                self.lines.remove(i);
                true
            }
            None => false,
        }
    }

    /// Take `quantity` units off a line, removing it once nothing is left.
    ///
    /// Used after an order so units added while it was in flight survive.
    pub fn deduct(&mut self, id: ProductId, quantity: u32) -> bool {
        let Some(line) = self.line_mut(id) else {
            return false;
        };
        if line.quantity > quantity {
            line.quantity -= quantity;
            true
        } else {
            self.remove(id)
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item_id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines, dangling ones included.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// View of the cart against `snapshot`: present lines re-priced, dangling
    /// lines set aside. The store itself is not modified.
    #[must_use]
    pub fn reconcile(&self, snapshot: &CatalogSnapshot) -> ReconciledCart {
        let mut reconciled = ReconciledCart::default();
        for line in &self.lines {
            match snapshot.find_by_id(line.item_id) {
                Some(item) => reconciled.lines.push(ReconciledLine::new(item, line.quantity)),
                None => reconciled.dangling.push(line.clone()),
            }
        }
        reconciled
    }

    /// Sum of `price × quantity` over lines still in `snapshot`.
    #[must_use]
    pub fn total(&self, snapshot: &CatalogSnapshot) -> Money {
        self.reconcile(snapshot).total()
    }
}

/// A cart line priced against the current catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledLine {
    pub item_id: ProductId,
    pub quantity: u32,
    pub name: String,
    pub unit_price: Money,
    pub available: bool,
    pub line_total: Money,
}

impl ReconciledLine {
    fn new(item: &CatalogItem, quantity: u32) -> Self {
        let unit_price = item.unit_price();
        Self {
            item_id: item.id,
            quantity,
            name: item.name.clone(),
            unit_price,
            available: item.available,
            line_total: unit_price.times(quantity),
        }
    }
}

/// Result of [`CartStore::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledCart {
    /// Lines whose product is in the catalog, in cart order.
    pub lines: Vec<ReconciledLine>,
    /// Lines whose product is gone. Excluded from every total.
    pub dangling: Vec<CartLine>,
}

impl ReconciledCart {
    #[must_use]
    pub fn total(&self) -> Money {
        self.lines.iter().map(|line| line.line_total).sum()
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// No purchasable lines (dangling lines do not count).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines the catalog currently marks unavailable.
    pub fn unavailable(&self) -> impl Iterator<Item = &ReconciledLine> {
        self.lines.iter().filter(|line| !line.available)
    }
}
