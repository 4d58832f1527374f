//! Catalog client and cache against a mocked catalog service.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET | `/api/products` | `list_*`, `refresh_*`, `server_error_*` |
//! | GET | `/api/products/search` | `search_*` |
//! | GET | `/api/product/{id}` | `product_*` |
//! | GET | `/api/categories` | `categories_*` |
//! | GET | `/api/orders/{orderNumber}` | `order_*` |

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopfront_core::{OrderStatus, ProductId};
use shopfront_integration_tests::{config, mount_products, product};
use shopfront_storefront::api::{ApiError, CatalogClient};
use shopfront_storefront::catalog::{CatalogCache, RefreshOutcome};
use shopfront_storefront::config::StorefrontConfig;

fn client(server: &MockServer) -> CatalogClient {
    let dir = tempfile::tempdir().unwrap();
    CatalogClient::new(&config(server, dir.path()).api).unwrap()
}

#[tokio::test]
async fn list_products_decodes_the_catalog() {
    let server = MockServer::start().await;
    mount_products(
        &server,
        vec![
            product(1, "Trail Shoes", 2499, "Sports"),
            product(2, "Desk Lamp", 899, "Home"),
        ],
    )
    .await;

    let items = client(&server).list_products().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "Trail Shoes");
    assert_eq!(items[1].category.as_deref(), Some("Home"));
    assert!(items.iter().all(|i| i.available));
}

#[tokio::test]
async fn product_missing_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/product/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_product(ProductId::new(99))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert!(!err.is_network());
}

#[tokio::test]
async fn server_error_carries_the_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "database down"})))
        .mount(&server)
        .await;

    let err = client(&server).list_products().await.unwrap_err();
    match &err {
        ApiError::Status {
            status, message, ..
        } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "database down");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
    assert!(err.is_network());
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    // Nothing listens on port 1.
    let config = StorefrontConfig::from_lookup(|key| {
        (key == "SHOPFRONT_API_URL").then(|| "http://127.0.0.1:1/api".to_string())
    })
    .unwrap();
    let client = CatalogClient::new(&config.api).unwrap();

    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }));
    assert!(err.is_network());
}

#[tokio::test]
async fn search_sends_the_keyword() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/search"))
        .and(query_param("keyword", "shoe"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([product(1, "Trail Shoes", 2499, "Sports")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server).search_products("shoe").await.unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn product_detail_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/product/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product(3, "Kettle", 1299, "Home")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let first = client.get_product(ProductId::new(3)).await.unwrap();
    let second = client.get_product(ProductId::new(3)).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn product_invalidation_forces_a_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/product/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product(3, "Kettle", 1299, "Home")))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    client.get_product(ProductId::new(3)).await.unwrap();
    client.invalidate_product(ProductId::new(3)).await;
    client.get_product(ProductId::new(3)).await.unwrap();
}

#[tokio::test]
async fn categories_decode_with_active_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Home"},
            {"id": 2, "name": "Sports", "active": false}
        ])))
        .mount(&server)
        .await;

    let categories = client(&server).list_categories().await.unwrap();
    assert!(categories[0].active);
    assert!(!categories[1].active);
}

#[tokio::test]
async fn refresh_through_the_client_replaces_the_snapshot() {
    let server = MockServer::start().await;
    mount_products(
        &server,
        vec![
            product(1, "Trail Shoes", 2499, "Sports"),
            product(2, "Desk Lamp", 899, "Home"),
        ],
    )
    .await;

    let cache = CatalogCache::new(client(&server));
    assert!(cache.snapshot().is_empty());

    let outcome = cache.refresh().await;
    assert!(matches!(outcome, RefreshOutcome::Applied { items: 2 }));
    assert_eq!(cache.filter_by_category("Home").len(), 1);
    assert_eq!(cache.filter_by_keyword("SHOES").len(), 1);
    assert!(cache.find_by_id(ProductId::new(2)).is_some());
    assert!(!cache.status().has_error());
}

#[tokio::test]
async fn refresh_failure_keeps_the_previous_snapshot() {
    let server = MockServer::start().await;
    mount_products(&server, vec![product(1, "Trail Shoes", 2499, "Sports")]).await;

    let cache = CatalogCache::new(client(&server));
    assert!(cache.refresh().await.is_applied());

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(matches!(cache.refresh().await, RefreshOutcome::Failed(_)));
    assert_eq!(cache.snapshot().len(), 1);
    assert!(cache.status().has_error());
}

#[tokio::test]
async fn order_lookup_by_number() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders/ORD-9F8E7D6C"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "orderNumber": "ORD-9F8E7D6C",
            "status": "SHIPPED",
            "total": 1200
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let order = client.get_order("ORD-9F8E7D6C").await.unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);

    let err = client.get_order("ORD-00000000").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
