//! Cart route handlers.
//!
//! Every mutating handler returns the updated cart so clients can re-render
//! without a second request.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shophub_core::{Price, ProductId, Totals};
use tracing::instrument;

use crate::cart_store::CartStore;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    pub image: String,
    pub image_alt: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    /// Formatted unit price.
    pub price: String,
    /// Formatted line total.
    pub line_price: String,
}

/// Formatted totals for display.
#[derive(Debug, Clone, Serialize)]
pub struct TotalsDisplay {
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub total: String,
}

impl From<&Totals> for TotalsDisplay {
    fn from(totals: &Totals) -> Self {
        Self {
            subtotal: format_price(totals.subtotal),
            tax: format_price(totals.tax),
            shipping: format_price(totals.shipping),
            total: format_price(totals.total),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub totals: Totals,
    pub display: TotalsDisplay,
    /// Whether `POST /cart/undo` would restore a line right now.
    pub can_undo: bool,
}

impl CartView {
    /// Snapshot the store's current cart.
    #[must_use]
    pub fn from_store(store: &CartStore) -> Self {
        let items: Vec<CartItemView> = store
            .detailed_lines()
            .into_iter()
            .map(|line| CartItemView {
                product_id: line.product.id,
                name: line.product.name.clone(),
                category: line.product.category.clone(),
                image: line.product.image.clone(),
                image_alt: line.product.image_alt.clone(),
                quantity: line.quantity.get(),
                unit_price: line.product.price,
                line_total: line.line_total,
                price: format_price(line.product.price),
                line_price: format_price(line.line_total),
            })
            .collect();
        let totals = store.compute_totals();

        Self {
            item_count: items.iter().map(|item| item.quantity).sum(),
            items,
            display: TotalsDisplay::from(&totals),
            totals,
            can_undo: store.can_undo(),
        }
    }
}

fn format_price(amount: Decimal) -> String {
    Price::usd(amount).display()
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity: Option<u32>,
}

/// Update cart request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
}

/// Undo response.
#[derive(Debug, Serialize)]
pub struct UndoResponse {
    pub restored: bool,
    pub cart: CartView,
}

/// Cart badge count.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u32,
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<CartView>> {
    let store = state.cart()?;
    Ok(Json(CartView::from_store(&store)))
}

/// Add an item to the cart.
///
/// Unknown products leave the cart untouched and return 404.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartView>> {
    let mut store = state.cart()?;
    let id = ProductId::new(form.product_id);
    if !store.add_item(id, form.quantity.unwrap_or(1)) {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    add_breadcrumb("cart", "Added item", Some(&[("product_id", &id.to_string())]));
    Ok(Json(CartView::from_store(&store)))
}

/// Set a line's quantity. Zero or less removes it.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(form): Json<UpdateCartForm>,
) -> Result<Json<CartView>> {
    let mut store = state.cart()?;
    store.update_quantity(ProductId::new(form.product_id), form.quantity);
    Ok(Json(CartView::from_store(&store)))
}

/// Remove a line from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let mut store = state.cart()?;
    store.remove_item(ProductId::new(form.product_id));
    Ok(Json(CartView::from_store(&store)))
}

/// Restore the most recently removed line.
#[instrument(skip(state))]
pub async fn undo(State(state): State<AppState>) -> Result<Json<UndoResponse>> {
    let mut store = state.cart()?;
    let restored = store.undo_remove();
    Ok(Json(UndoResponse {
        restored,
        cart: CartView::from_store(&store),
    }))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartView>> {
    let mut store = state.cart()?;
    store.clear();
    Ok(Json(CartView::from_store(&store)))
}

/// Cart badge count.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Result<Json<CountResponse>> {
    let store = state.cart()?;
    Ok(Json(CountResponse {
        count: store.item_count(),
    }))
}
