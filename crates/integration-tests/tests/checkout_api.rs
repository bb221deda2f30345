//! Integration tests for checkout and order history.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;
use shophub_core::{Order, ProductId};
use shophub_integration_tests::{TestApp, send, valid_checkout};
use shophub_storefront::{FileStorage, Storage, StorageError, StorefrontConfig};

#[tokio::test]
async fn test_checkout_empty_cart_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app.post("/checkout", valid_checkout()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad request: Cart is empty");
    let (_, orders) = app.get("/orders").await;
    assert_eq!(orders["count"], 0);
}

#[tokio::test]
async fn test_checkout_reports_every_invalid_field() {
    let app = TestApp::new();
    app.post("/cart/add", json!({"product_id": 1})).await;

    let (status, body) = app
        .post(
            "/checkout",
            json!({"full_name": "  ", "email": "nope", "phone": "12", "zip": "ABCDE"}),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = &body["errors"];
    for field in ["full_name", "email", "phone", "street", "city", "state", "zip"] {
        assert!(errors[field].is_string(), "expected an error for {field}");
    }
    assert_eq!(errors["email"], "Please enter a valid email address");

    let (_, cart) = app.get("/cart").await;
    assert_eq!(cart["item_count"], 1);
}

#[tokio::test]
async fn test_checkout_places_order_and_clears_cart() {
    let app = TestApp::new();
    app.post("/cart/add", json!({"product_id": 4, "quantity": 2}))
        .await;
    app.post("/cart/add", json!({"product_id": 11})).await;

    let (status, body) = app.post("/checkout", valid_checkout()).await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = body["order_id"].as_str().unwrap_or_default().to_string();
    assert!(order_id.starts_with("ORD-"));
    assert_eq!(order_id.rsplit('-').next().map(str::len), Some(9));

    let (_, cart) = app.get("/cart/count").await;
    assert_eq!(cart["count"], 0);

    let (status, order) = app.get(&format!("/orders/{order_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["customer"]["address"]["country"], "US");
    assert_eq!(order["lines"].as_array().map(Vec::len), Some(2));
    // 2 x 24.99 + 19.99 = 69.97, tax 7.00, shipping 10.00
    assert_eq!(order["totals"]["subtotal"], "69.97");
    assert_eq!(order["totals"]["tax"], "7.00");
    assert_eq!(order["totals"]["total"], "86.97");

    let (_, orders) = app.get("/orders").await;
    assert_eq!(orders["count"], 1);
    assert_eq!(orders["orders"][0]["id"], order_id.as_str());
}

#[tokio::test]
async fn test_unknown_order() {
    let app = TestApp::new();
    let (status, body) = app.get("/orders/ORD-0-MISSING").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_orders_use_configured_pricing_and_namespace() {
    let config = StorefrontConfig::from_lookup(|key| match key {
        "STOREFRONT_NAMESPACE" => Some("acme.shop".to_string()),
        "STOREFRONT_TAX_RATE" => Some("0.07".to_string()),
        "STOREFRONT_SHIPPING_FEE" => Some("0".to_string()),
        _ => None,
    })
    .unwrap_or_default();
    let app = TestApp::with_config(config);

    app.post("/cart/add", json!({"product_id": 1})).await;
    let (status, _) = app.post("/checkout", valid_checkout()).await;
    assert_eq!(status, StatusCode::CREATED);

    let raw = app.storage.get("acme.shop.orders").ok().flatten();
    let orders: Vec<Order> = raw
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default();
    assert_eq!(orders.len(), 1);
    let totals = orders.first().map(|o| *o.totals()).unwrap_or_default();
    // 89.99 x 7% = 6.2993 -> 6.30
    assert_eq!(totals.tax.to_string(), "6.30");
    assert!(totals.shipping.is_zero());
    assert_eq!(
        orders.first().map(|o| o.lines().iter().map(|l| l.product_id).collect::<Vec<_>>()),
        Some(vec![ProductId::new(1)])
    );
}

/// Storage that refuses writes to the order list.
#[derive(Debug, Default)]
struct OrdersUnwritable(shophub_storefront::MemoryStorage);

impl Storage for OrdersUnwritable {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key.ends_with(".orders") {
            return Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::other("disk full"),
            });
        }
        self.0.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.0.remove(key)
    }
}

#[tokio::test]
async fn test_order_write_failure_is_500_and_keeps_cart() {
    let router = TestApp::router(
        StorefrontConfig::default(),
        Arc::new(OrdersUnwritable::default()),
    );
    send(
        &router,
        Method::POST,
        "/cart/add",
        Some(json!({"product_id": 3})),
    )
    .await;

    let (status, body) = send(&router, Method::POST, "/checkout", Some(valid_checkout())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");

    let (_, count) = send(&router, Method::GET, "/cart/count", None).await;
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn test_file_storage_survives_restart() {
    let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let config = StorefrontConfig {
        data_dir: tmp.path().to_path_buf(),
        ..StorefrontConfig::default()
    };

    let first = TestApp::router(config.clone(), Arc::new(FileStorage::new(tmp.path())));
    send(
        &first,
        Method::POST,
        "/cart/add",
        Some(json!({"product_id": 6, "quantity": 2})),
    )
    .await;
    let (status, _) = send(&first, Method::POST, "/checkout", Some(valid_checkout())).await;
    assert_eq!(status, StatusCode::CREATED);
    send(&first, Method::POST, "/cart/add", Some(json!({"product_id": 12}))).await;

    let second = TestApp::router(config, Arc::new(FileStorage::new(tmp.path())));
    let (_, orders) = send(&second, Method::GET, "/orders", None).await;
    assert_eq!(orders["count"], 1);
    let (_, count) = send(&second, Method::GET, "/cart/count", None).await;
    assert_eq!(count["count"], 1);

    assert!(tmp.path().join("shophub.cart.json").exists());
    assert!(tmp.path().join("shophub.orders.json").exists());
}
