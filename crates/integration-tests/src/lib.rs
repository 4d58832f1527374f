//! Shared fixtures for the shopfront integration tests.
//!
//! Every test runs against a `wiremock` server standing in for the catalog
//! service and a throwaway data directory, so no external services are
//! needed:
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```

use std::path::Path;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopfront_core::ShippingDetails;
use shopfront_storefront::config::StorefrontConfig;

/// Configuration pointing at `server` and storing documents in `data_dir`.
///
/// # Panics
///
/// Panics if the mock server URI is rejected, which means the fixture is broken.
#[must_use]
pub fn config(server: &MockServer, data_dir: &Path) -> StorefrontConfig {
    let api_url = format!("{}/api", server.uri());
    let data_dir = data_dir.display().to_string();
    StorefrontConfig::from_lookup(|key| match key {
        "SHOPFRONT_API_URL" => Some(api_url.clone()),
        "SHOPFRONT_DATA_DIR" => Some(data_dir.clone()),
        "SHOPFRONT_HTTP_TIMEOUT_SECS" => Some("5".to_string()),
        _ => None,
    })
    .unwrap_or_else(|e| panic!("test configuration rejected: {e}"))
}

/// A product as the service serializes it.
#[must_use]
pub fn product(id: i64, name: &str, price: u32, category: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "brand": "Stride",
        "description": format!("{name} for everyday use"),
        "price": price,
        "category": category,
        "releaseDate": "2025-11-02",
        "productAvailable": true,
        "stockQuantity": 10,
        "imageName": null
    })
}

/// Same as [`product`], but out of stock.
#[must_use]
pub fn unavailable_product(id: i64, name: &str, price: u32, category: &str) -> Value {
    let mut value = product(id, name, price, category);
    value["productAvailable"] = json!(false);
    value["stockQuantity"] = json!(0);
    value
}

/// Serve `products` from `GET /api/products`.
pub async fn mount_products(server: &MockServer, products: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(products)))
        .mount(server)
        .await;
}

/// Shipping details that pass validation.
#[must_use]
pub fn shipping() -> ShippingDetails {
    ShippingDetails {
        full_name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "9876543210".to_string(),
        address: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        pincode: "560001".to_string(),
    }
}
