//! Integration tests for the ShopHub storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shophub-integration-tests
//! ```
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; no
//! server or network is involved. [`TestApp`] wires the real routes to a
//! [`MemoryStorage`] (or any other backend) and the built-in catalog.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use shophub_storefront::{AppState, MemoryStorage, Storage, StorefrontConfig, catalog, routes};
use tower::ServiceExt;

/// The storefront router over test storage.
pub struct TestApp {
    router: Router,
    pub storage: MemoryStorage,
}

impl TestApp {
    /// Default configuration over fresh in-memory storage.
    ///
    /// # Panics
    ///
    /// Panics if the built-in catalog is invalid.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StorefrontConfig::default())
    }

    /// Custom configuration over fresh in-memory storage.
    ///
    /// # Panics
    ///
    /// Panics if the built-in catalog is invalid.
    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let storage = MemoryStorage::new();
        let router = Self::router(config, Arc::new(storage.clone()));
        Self { router, storage }
    }

    /// A router over an arbitrary storage backend.
    ///
    /// # Panics
    ///
    /// Panics if the built-in catalog is invalid.
    #[must_use]
    pub fn router(config: StorefrontConfig, storage: Arc<dyn Storage>) -> Router {
        let catalog = catalog::builtin().expect("built-in catalog is valid");
        routes::app(AppState::new(config, storage, Arc::new(catalog)))
    }

    /// Send a GET request.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        send(&self.router, Method::GET, uri, None).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        send(&self.router, Method::POST, uri, Some(body)).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Send one request through `router` and decode the JSON response.
///
/// Non-JSON bodies (like `/health`) come back as a JSON string.
///
/// # Panics
///
/// Panics if the request cannot be built or the body cannot be read.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

/// A checkout form that passes validation.
#[must_use]
pub fn valid_checkout() -> Value {
    serde_json::json!({
        "full_name": "Ada Lovelace",
        "email": "ada@example.com",
        "phone": "555-123-4567",
        "street": "1 Analytical Way",
        "city": "London",
        "state": "LN",
        "zip": "12345"
    })
}
