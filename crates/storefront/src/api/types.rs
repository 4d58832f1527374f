//! Wire types exchanged with the catalog/order service.
//!
//! All records use camelCase JSON. Unknown fields are ignored so the service
//! can grow without breaking older clients.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use shopfront_core::{
    CategoryId, Money, OrderId, OrderStatus, PaymentMethod, ProductId, ShippingDetails, UserId,
    UserRole,
};

// =============================================================================
// Catalog
// =============================================================================

/// A sellable product as known to the catalog service.
///
/// Never mutated locally; a fetched batch is a point-in-time snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(rename = "productAvailable", default = "available_by_default")]
    pub available: bool,
    #[serde(default)]
    pub stock_quantity: Option<u32>,
    #[serde(default)]
    pub image_name: Option<String>,
}

const fn available_by_default() -> bool {
    true
}

impl CatalogItem {
    /// Unit price in the store currency. Negative prices read as zero.
    #[must_use]
    pub fn unit_price(&self) -> Money {
        Money::new(self.price.max(Decimal::ZERO))
    }

    /// Whether the service reported an image for this product.
    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image_name.is_some()
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "available_by_default")]
    pub active: bool,
}

/// A product image as returned by `GET /product/{id}/image`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductImage {
    /// MIME type reported by the service.
    pub content_type: Option<String>,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

// =============================================================================
// Accounts
// =============================================================================

/// Email/password pair posted to the login endpoints.
///
/// `Debug` never shows the password.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(serialize_with = "expose_password")]
    pub password: SecretString,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /auth/register`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(serialize_with = "expose_password")]
    pub password: SecretString,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn expose_password<S: Serializer>(password: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(password.expose_secret())
}

/// The signed-in user as returned by the login endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

impl UserProfile {
    /// Display name, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.to_string(),
            (None, None) => self.email.clone(),
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Reference to a product inside an order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
}

/// One line of an order request. The service re-prices it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItemRequest {
    pub product: ProductRef,
    pub quantity: u32,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub shipping_address: String,
    pub city: String,
    pub pincode: String,
    pub payment_method: PaymentMethod,
}

impl OrderRequest {
    /// Build a request from validated shipping details.
    #[must_use]
    pub fn new(
        items: Vec<OrderItemRequest>,
        shipping: &ShippingDetails,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            items,
            customer_name: shipping.full_name.trim().to_string(),
            email: shipping.email.trim().to_string(),
            phone: shipping.phone.trim().to_string(),
            shipping_address: shipping.address.trim().to_string(),
            city: shipping.city.trim().to_string(),
            pincode: shipping.pincode.trim().to_string(),
            payment_method,
        }
    }
}

/// An order line as priced by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrderItem {
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub total: Option<Decimal>,
}

/// An order created by `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    #[serde(default)]
    pub id: Option<OrderId>,
    pub order_number: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub shipping_cost: Option<Decimal>,
    pub total: Decimal,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<PlacedOrderItem>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_item_from_service_json() {
        let json = r#"{
            "id": 3,
            "name": "Trail Shoes",
            "brand": "Stride",
            "price": 2499.50,
            "category": "Sports and outdoor",
            "productAvailable": false,
            "stockQuantity": 0,
            "imageName": "shoes.png",
            "imageData": null
        }"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, ProductId::new(3));
        assert_eq!(item.price, Decimal::new(24995, 1));
        assert!(!item.available);
        assert!(item.has_image());
        assert_eq!(item.description, None);
    }

    #[test]
    fn test_catalog_item_defaults_to_available() {
        let item: CatalogItem =
            serde_json::from_str(r#"{"id": 1, "name": "Mug", "price": 100}"#).unwrap();
        assert!(item.available);
    }

    #[test]
    fn test_negative_price_reads_as_zero() {
        let item: CatalogItem =
            serde_json::from_str(r#"{"id": 1, "name": "Glitch", "price": -5}"#).unwrap();
        assert!(item.unit_price().is_zero());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials {
            email: "a@b.co".to_string(),
            password: SecretString::from("hunter22"),
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter22"));

        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["password"], "hunter22");
    }

    #[test]
    fn test_user_profile_display_name() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"id": 9, "email": "a@b.co", "firstName": "Asha", "lastName": "Rao", "role": "ADMIN", "message": "Login successful"}"#,
        )
        .unwrap();
        assert_eq!(profile.display_name(), "Asha Rao");
        assert_eq!(profile.role, UserRole::Admin);
    }

    #[test]
    fn test_order_request_shape() {
        let shipping = ShippingDetails {
            full_name: " Asha Rao ".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            pincode: "560001".to_string(),
        };
        let request = OrderRequest::new(
            vec![OrderItemRequest {
                product: ProductRef {
                    id: ProductId::new(1),
                },
                quantity: 2,
            }],
            &shipping,
            PaymentMethod::Upi,
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["items"][0]["product"]["id"], 1);
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["customerName"], "Asha Rao");
        assert_eq!(json["paymentMethod"], "upi");
    }
}
