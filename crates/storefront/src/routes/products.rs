//! Product listing and detail handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Serialize;
use shophub_core::{Product, ProductId, ProductQuery, SortOrder};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product data for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    /// Formatted price, e.g. `$89.99`.
    pub price_display: String,
    pub description: String,
    pub image: String,
    pub image_alt: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            price_display: product.unit_price().display(),
            description: product.description.clone(),
            image: product.image.clone(),
            image_alt: product.image_alt.clone(),
        }
    }
}

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub count: usize,
    pub sort: SortOrder,
    pub products: Vec<ProductView>,
}

/// Category listing response.
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// List products, filtered and sorted by query parameters.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<ProductListResponse> {
    let products: Vec<ProductView> = state
        .catalog()
        .query(&query)
        .into_iter()
        .map(ProductView::from)
        .collect();

    Json(ProductListResponse {
        count: products.len(),
        sort: query.sort,
        products,
    })
}

/// Show a single product.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<ProductView>> {
    state
        .catalog()
        .get(ProductId::new(id))
        .map(|product| Json(ProductView::from(product)))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// List distinct categories in catalog order.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state
            .catalog()
            .categories()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}
