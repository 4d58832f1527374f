//! Cache types for catalog service responses.

use super::types::{CatalogItem, ProductImage};

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<CatalogItem>),
    Image(ProductImage),
}

/// Cache key for a product's detail record.
pub fn product_key(id: impl std::fmt::Display) -> String {
    format!("product:{id}")
}

/// Cache key for a product's image.
pub fn image_key(id: impl std::fmt::Display) -> String {
    format!("image:{id}")
}
