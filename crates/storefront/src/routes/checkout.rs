//! Checkout and order history handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use shophub_core::{Order, OrderId};
use tracing::instrument;

use crate::checkout::{self, CheckoutForm};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Successful checkout response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_id: OrderId,
}

/// Order listing response.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub count: usize,
    pub orders: Vec<Order>,
}

/// Submit the checkout form.
///
/// 201 with the order id on success, 400 for an empty cart, 422 with
/// per-field messages for an invalid form.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<CheckoutForm>,
) -> Result<(StatusCode, Json<CheckoutResponse>)> {
    let mut store = state.cart()?;
    let order_id = checkout::submit(&mut store, state.orders(), &form)?;

    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order_id.as_str())]));
    Ok((StatusCode::CREATED, Json(CheckoutResponse { order_id })))
}

/// List persisted orders, oldest first.
#[instrument(skip(state))]
pub async fn orders(State(state): State<AppState>) -> Json<OrderListResponse> {
    let orders = state.orders().list();
    Json(OrderListResponse {
        count: orders.len(),
        orders,
    })
}

/// Show a single order.
#[instrument(skip(state))]
pub async fn order(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Order>> {
    state
        .orders()
        .find(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}
