//! Point-in-time view of the catalog.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use shopfront_core::ProductId;

use crate::api::CatalogItem;

/// An immutable batch of catalog items as returned by one fetch.
///
/// Snapshots are shared behind `Arc` and never change after construction;
/// a refresh builds a new one and swaps it in.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    items: Vec<CatalogItem>,
    index: HashMap<ProductId, usize>,
    epoch: u64,
    fetched_at: Option<DateTime<Utc>>,
}

impl CatalogSnapshot {
    /// Build a snapshot from fetched items.
    ///
    /// Ids are unique in a snapshot; if the service sends a duplicate the
    /// first occurrence wins.
    #[must_use]
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self::with_epoch(items, 0, None)
    }

    pub(crate) fn with_epoch(
        items: Vec<CatalogItem>,
        epoch: u64,
        fetched_at: Option<DateTime<Utc>>,
    ) -> Self {
        let mut unique = Vec::with_capacity(items.len());
        let mut index = HashMap::with_capacity(items.len());
        for item in items {
            if index.contains_key(&item.id) {
                warn!(product_id = %item.id, "Duplicate product id in catalog response");
                continue;
            }
            index.insert(item.id, unique.len());
            unique.push(item);
        }

        Self {
            items: unique,
            index,
            epoch,
            fetched_at,
        }
    }

    /// Token of the refresh that produced this snapshot (0 = never refreshed).
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// When the snapshot was fetched.
    #[must_use]
    pub const fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// All items in service order.
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item. Never touches the network.
    #[must_use]
    pub fn find_by_id(&self, id: ProductId) -> Option<&CatalogItem> {
        self.index.get(&id).and_then(|&i| self.items.get(i))
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.index.contains_key(&id)
    }

    /// Items whose category equals `category` exactly. Empty means all.
    #[must_use]
    pub fn filter_by_category(&self, category: &str) -> Vec<&CatalogItem> {
        if category.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|item| item.category.as_deref() == Some(category))
            .collect()
    }

    /// Case-insensitive substring match over name, brand, category and
    /// description. Empty or whitespace-only text means all.
    #[must_use]
    pub fn filter_by_keyword(&self, text: &str) -> Vec<&CatalogItem> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|item| {
                std::iter::once(item.name.as_str())
                    .chain(item.brand.as_deref())
                    .chain(item.category.as_deref())
                    .chain(item.description.as_deref())
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Distinct categories, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .items
            .iter()
            .filter_map(|item| item.category.as_deref())
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }
}
