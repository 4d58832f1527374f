//! Admin request and response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopfront_core::{FieldError, OrderStatus, UserId, UserRole};
use shopfront_storefront::api::{CatalogItem, PlacedOrder};

// =============================================================================
// Products
// =============================================================================

/// Product fields edited in the admin product form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: Option<String>,
    pub brand: String,
    pub price: Decimal,
    pub category: String,
    pub release_date: Option<String>,
    pub stock_quantity: u32,
}

/// JSON `product` part of the multipart upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductPayload<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    brand: &'a str,
    price: Decimal,
    category: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    release_date: Option<&'a str>,
    stock_quantity: u32,
    product_available: bool,
}

impl ProductForm {
    /// Prefill the form from an existing product.
    #[must_use]
    pub fn from_item(item: &CatalogItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            brand: item.brand.clone().unwrap_or_default(),
            price: item.price,
            category: item.category.clone().unwrap_or_default(),
            release_date: item.release_date.clone(),
            stock_quantity: item.stock_quantity.unwrap_or(0),
        }
    }

    /// Products are listed as available exactly when they are in stock.
    #[must_use]
    pub const fn available(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Check every field, returning all problems at once.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Product name is required"));
        }
        if self.brand.trim().is_empty() {
            errors.push(FieldError::new("brand", "Brand is required"));
        }
        if self.price <= Decimal::ZERO {
            errors.push(FieldError::new("price", "Price must be greater than 0"));
        }
        if self.category.trim().is_empty() {
            errors.push(FieldError::new("category", "Category is required"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub(crate) fn payload(&self) -> ProductPayload<'_> {
        ProductPayload {
            name: self.name.trim(),
            description: self.description.as_deref().map(str::trim),
            brand: self.brand.trim(),
            price: self.price,
            category: self.category.trim(),
            release_date: self.release_date.as_deref(),
            stock_quantity: self.stock_quantity,
            product_available: self.available(),
        }
    }
}

/// Image attached to a product create/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    /// MIME type; the service sniffs it when absent.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

// =============================================================================
// Categories
// =============================================================================

/// Body of category create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub active: bool,
}

impl CategoryForm {
    /// # Errors
    ///
    /// Returns a field error when the name is blank.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        if self.name.trim().is_empty() {
            Err(vec![FieldError::new("name", "Category name is required")])
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// An order as seen by the admin console, with customer contact details.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrder {
    #[serde(flatten)]
    pub order: PlacedOrder,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// Body of `PUT /admin/orders/{id}/status`.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct StatusUpdate {
    pub status: OrderStatus,
}

// =============================================================================
// Users and dashboard
// =============================================================================

/// A customer or administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub blocked: bool,
}

/// Counters from `GET /admin/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_products: u64,
    pub total_orders: u64,
    pub total_users: u64,
    pub total_categories: u64,
    pub total_revenue: Option<Decimal>,
    pub pending_orders: u64,
    pub shipped_orders: u64,
    pub delivered_orders: u64,
}
