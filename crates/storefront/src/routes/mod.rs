//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Product listing (?search=&category=&sort=)
//! GET  /products/{id}          - Product detail
//! GET  /categories             - Distinct categories
//!
//! # Cart
//! GET  /cart                   - Cart lines, totals and item count
//! POST /cart/add               - Add to cart {product_id, quantity?}
//! POST /cart/update            - Update quantity {product_id, quantity}
//! POST /cart/remove            - Remove item {product_id}
//! POST /cart/undo              - Restore the last removed item
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge
//!
//! # Checkout
//! POST /checkout               - Place an order
//! GET  /orders                 - Order history
//! GET  /orders/{id}            - Order detail
//! ```

pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{http_span, request_id_middleware};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/undo", post(cart::undo))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::orders))
        .route("/{id}", get(checkout::order))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes())
        .route("/categories", get(products::categories))
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::submit))
        .nest("/orders", order_routes())
}

/// The complete application: routes, state, request ids and tracing.
///
/// Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(http_span))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
