//! Admin client against a mocked service.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST | `/api/product` | `create_product_*` |
//! | PUT | `/api/product/{id}` | `update_product_*` |
//! | PUT | `/api/admin/categories/{id}` | `toggle_category_*` |
//! | PUT | `/api/admin/orders/{id}/status` | `order_status_*` |
//! | GET | `/api/admin/orders/status/{status}` | `orders_by_status_*` |
//! | PUT | `/api/admin/users/{id}/block` | `block_user_*` |
//! | GET | `/api/admin/dashboard` | `dashboard_*` |

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopfront_admin::{AdminClient, AdminError, CategoryForm, ImageUpload, ProductForm};
use shopfront_core::{CategoryId, OrderId, OrderStatus, ProductId, UserId};
use shopfront_integration_tests::{config, product};
use shopfront_storefront::api::ApiError;

fn admin(server: &MockServer) -> AdminClient {
    let dir = tempfile::tempdir().unwrap();
    AdminClient::new(&config(server, dir.path()).api).unwrap()
}

fn form() -> ProductForm {
    ProductForm {
        name: "Trail Shoes".to_string(),
        description: Some("Grippy soles".to_string()),
        brand: "Stride".to_string(),
        price: Decimal::from(2499),
        category: "Sports".to_string(),
        release_date: Some("2025-11-02".to_string()),
        stock_quantity: 12,
    }
}

#[tokio::test]
async fn create_product_sends_a_multipart_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/product"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains(r#"name="product""#))
        .and(body_string_contains(r#""name":"Trail Shoes""#))
        .and(body_string_contains(r#""productAvailable":true"#))
        .and(body_string_contains(r#"name="imageFile""#))
        .respond_with(ResponseTemplate::new(201).set_body_json(product(11, "Trail Shoes", 2499, "Sports")))
        .expect(1)
        .mount(&server)
        .await;

    let image = ImageUpload {
        file_name: "shoes.png".to_string(),
        content_type: Some("image/png".to_string()),
        bytes: b"not-really-a-png".to_vec(),
    };
    let created = admin(&server)
        .create_product(&form(), Some(image))
        .await
        .unwrap();
    assert_eq!(created.id, ProductId::new(11));
}

#[tokio::test]
async fn create_product_with_an_invalid_form_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/product"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let bad = ProductForm {
        name: "  ".to_string(),
        price: Decimal::ZERO,
        ..form()
    };
    let err = admin(&server).create_product(&bad, None).await.unwrap_err();
    let AdminError::Validation(fields) = err else {
        panic!("expected validation error, got {err:?}");
    };
    let names: Vec<_> = fields.iter().map(|f| f.field).collect();
    assert_eq!(names, vec!["name", "price"]);
}

#[tokio::test]
async fn update_product_without_image_omits_the_image_part() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/product/11"))
        .and(body_string_contains(r#""stockQuantity":0"#))
        .and(body_string_contains(r#""productAvailable":false"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(product(11, "Trail Shoes", 2499, "Sports")))
        .expect(1)
        .mount(&server)
        .await;

    let sold_out = ProductForm {
        stock_quantity: 0,
        ..form()
    };
    admin(&server)
        .update_product(ProductId::new(11), &sold_out, None)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(!body.contains("imageFile"));
}

#[tokio::test]
async fn toggle_category_flips_the_active_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/categories/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "name": "Garden", "description": "Outdoor living", "active": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/categories/3"))
        .and(body_json(json!({
            "name": "Garden", "description": "Outdoor living", "active": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "name": "Garden", "description": "Outdoor living", "active": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let category = admin(&server)
        .toggle_category(CategoryId::new(3))
        .await
        .unwrap();
    assert!(!category.active);
}

#[tokio::test]
async fn blank_category_name_is_rejected_locally() {
    let server = MockServer::start().await;
    let form = CategoryForm {
        name: String::new(),
        description: None,
        active: true,
    };
    let err = admin(&server).create_category(&form).await.unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn order_status_update_sends_the_new_status() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/orders/4/status"))
        .and(body_json(json!({"status": "SHIPPED"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "orderNumber": "ORD-9F8E7D6C",
            "status": "SHIPPED",
            "total": 1200,
            "customerName": "Asha Rao"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = admin(&server)
        .update_order_status(OrderId::new(4), OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(order.order.status, OrderStatus::Shipped);
    assert_eq!(order.customer_name.as_deref(), Some("Asha Rao"));
}

#[tokio::test]
async fn orders_by_status_uses_the_status_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/orders/status/DELIVERED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let orders = admin(&server)
        .orders_by_status(OrderStatus::Delivered)
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn block_user_returns_the_updated_account() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/users/5/block"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "email": "asha@example.com", "role": "USER", "blocked": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = admin(&server)
        .set_blocked(UserId::new(5), true)
        .await
        .unwrap();
    assert!(user.blocked);
}

#[tokio::test]
async fn dashboard_decodes_counters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalProducts": 40,
            "totalOrders": 12,
            "totalUsers": 9,
            "totalRevenue": 45210.5,
            "pendingOrders": 3,
            "shippedOrders": 4,
            "deliveredOrders": 5,
            "totalCategories": 6
        })))
        .mount(&server)
        .await;

    let stats = admin(&server).dashboard().await.unwrap();
    assert_eq!(stats.total_products, 40);
    assert_eq!(stats.pending_orders, 3);
    assert_eq!(stats.total_revenue, Some(Decimal::new(452_105, 1)));
}

#[tokio::test]
async fn deleting_a_missing_user_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/users/77"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = admin(&server).delete_user(UserId::new(77)).await.unwrap_err();
    assert!(matches!(err, AdminError::Api(ApiError::NotFound(_))));
    assert_eq!(err.status(), Some(404));
}
