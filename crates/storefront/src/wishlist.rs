//! Saved-for-later products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use shopfront_core::ProductId;

use crate::api::CatalogItem;
use crate::cart::{CartError, CartStore};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WishlistError {
    #[error("Product {0} is not in the wishlist")]
    NotFound(ProductId),

    /// The cart refused the item; the wishlist entry was kept.
    #[error("Could not move to cart: {0}")]
    Cart(#[from] CartError),
}

/// A saved product snapshot. Unique by product id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    #[serde(flatten)]
    pub item: CatalogItem,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

impl WishlistEntry {
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.item.id
    }
}

/// Ordered set of [`WishlistEntry`] keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<WishlistEntry>", into = "Vec<WishlistEntry>")]
pub struct WishlistStore {
    entries: Vec<WishlistEntry>,
}

impl From<Vec<WishlistEntry>> for WishlistStore {
    fn from(persisted: Vec<WishlistEntry>) -> Self {
        let mut wishlist = Self::default();
        for entry in persisted {
            if !wishlist.contains(entry.id()) {
                wishlist.entries.push(entry);
            }
        }
        wishlist
    }
}

impl From<WishlistStore> for Vec<WishlistEntry> {
    fn from(wishlist: WishlistStore) -> Self {
        wishlist.entries
    }
}

impl WishlistStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Save `item`. Returns `false` if it was already saved.
    pub fn add(&mut self, item: &CatalogItem) -> bool {
        if self.contains(item.id) {
            return false;
        }
        self.entries.push(WishlistEntry {
            item: item.clone(),
            added_at: Some(Utc::now()),
        });
        true
    }

    /// Returns whether an entry was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id() != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.entries.iter().any(|entry| entry.id() == id)
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&WishlistEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add one unit of the saved product to `cart`, then drop it from the
    /// wishlist. If the cart refuses, the entry stays where it was.
    ///
    /// Returns the cart line's quantity after the add.
    ///
    /// # Errors
    ///
    /// - [`WishlistError::NotFound`] if `id` is not saved
    /// - [`WishlistError::Cart`] if the cart add fails
    pub fn move_to_cart(&mut self, id: ProductId, cart: &mut CartStore) -> Result<u32, WishlistError> {
        let saved = self.get(id).ok_or(WishlistError::NotFound(id))?.item.clone();
        self.move_with(id, cart, &saved)
    }

    /// Like [`Self::move_to_cart`] but adds `current` (typically the latest
    /// catalog record for the product) instead of the saved snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`Self::move_to_cart`].
    pub fn move_with(
        &mut self,
        id: ProductId,
        cart: &mut CartStore,
        current: &CatalogItem,
    ) -> Result<u32, WishlistError> {
        if !self.contains(id) {
            return Err(WishlistError::NotFound(id));
        }
        let quantity = cart.add(current, 1)?;
        self.remove(id);
        debug!(product_id = %id, quantity, "Moved wishlist entry to cart");
        Ok(quantity)
    }
}
