//! Integration tests for the cart endpoints.

use axum::http::StatusCode;
use serde_json::json;
use shophub_integration_tests::TestApp;
use shophub_storefront::Storage;

#[tokio::test]
async fn test_empty_cart() {
    let app = TestApp::new();
    let (status, body) = app.get("/cart").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["item_count"], 0);
    assert_eq!(body["display"]["total"], "$0.00");
    assert_eq!(body["can_undo"], false);
}

#[tokio::test]
async fn test_add_merges_and_totals() {
    let app = TestApp::new();

    let (status, _) = app.post("/cart/add", json!({"product_id": 4})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app
        .post("/cart/add", json!({"product_id": 4, "quantity": 2}))
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["quantity"], 3);
    assert_eq!(body["items"][0]["line_price"], "$74.97");
    assert_eq!(body["display"]["subtotal"], "$74.97");
    assert_eq!(body["display"]["tax"], "$7.50");
    assert_eq!(body["display"]["shipping"], "$10.00");
    assert_eq!(body["display"]["total"], "$92.47");

    let (_, count) = app.get("/cart/count").await;
    assert_eq!(count["count"], 3);
}

#[tokio::test]
async fn test_free_shipping_above_threshold() {
    let app = TestApp::new();
    let (_, body) = app
        .post("/cart/add", json!({"product_id": 9, "quantity": 1}))
        .await;

    assert_eq!(body["display"]["subtotal"], "$199.99");
    assert_eq!(body["display"]["shipping"], "$0.00");
    assert_eq!(body["display"]["total"], "$219.99");
}

#[tokio::test]
async fn test_add_unknown_product() {
    let app = TestApp::new();
    let (status, body) = app.post("/cart/add", json!({"product_id": 404})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
    let (_, cart) = app.get("/cart").await;
    assert_eq!(cart["item_count"], 0);
}

#[tokio::test]
async fn test_update_clamps_and_zero_removes() {
    let app = TestApp::new();
    app.post("/cart/add", json!({"product_id": 1})).await;
    app.post("/cart/add", json!({"product_id": 2})).await;

    let (_, body) = app
        .post("/cart/update", json!({"product_id": 1, "quantity": 5000}))
        .await;
    assert_eq!(body["items"][0]["quantity"], 999);

    let (_, body) = app
        .post("/cart/update", json!({"product_id": 1, "quantity": 0}))
        .await;
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["product_id"], 2);
    assert_eq!(body["can_undo"], true);
}

#[tokio::test]
async fn test_remove_then_undo_restores_position() {
    let app = TestApp::new();
    for id in [1, 2, 3] {
        app.post("/cart/add", json!({"product_id": id})).await;
    }

    let (_, body) = app.post("/cart/remove", json!({"product_id": 2})).await;
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["can_undo"], true);

    let (status, body) = app.post("/cart/undo", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["restored"], true);
    let ids: Vec<i64> = body["cart"]["items"]
        .as_array()
        .unwrap_or(&Vec::new())
        .iter()
        .filter_map(|item| item["product_id"].as_i64())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let (_, body) = app.post("/cart/undo", json!({})).await;
    assert_eq!(body["restored"], false);
}

#[tokio::test]
async fn test_clear_empties_cart_and_discards_undo() {
    let app = TestApp::new();
    app.post("/cart/add", json!({"product_id": 1})).await;
    app.post("/cart/add", json!({"product_id": 2})).await;
    app.post("/cart/remove", json!({"product_id": 1})).await;

    let (_, body) = app.post("/cart/clear", json!({})).await;
    assert_eq!(body["item_count"], 0);
    assert_eq!(body["can_undo"], false);

    let (_, body) = app.post("/cart/undo", json!({})).await;
    assert_eq!(body["restored"], false);
    assert_eq!(body["cart"]["item_count"], 0);
}

#[tokio::test]
async fn test_cart_is_persisted_under_namespaced_key() {
    let app = TestApp::new();
    app.post("/cart/add", json!({"product_id": 7, "quantity": 2}))
        .await;

    let raw = app.storage.get("shophub.cart").ok().flatten();
    assert_eq!(raw.as_deref(), Some(r#"[{"id":7,"quantity":2}]"#));
}

#[tokio::test]
async fn test_corrupt_cart_blob_resets() {
    let app = TestApp::new();
    app.storage
        .set("shophub.cart", "definitely not json")
        .ok();

    let (status, body) = app.get("/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item_count"], 0);
    assert_eq!(app.storage.get("shophub.cart").ok().flatten(), None);
}

#[tokio::test]
async fn test_malformed_request_body() {
    let app = TestApp::new();
    let (status, _) = app
        .post("/cart/add", json!({"product_id": "shoes"}))
        .await;
    assert!(status.is_client_error());
    let (_, count) = app.get("/cart/count").await;
    assert_eq!(count["count"], 0);
}
