//! Read-only product catalog.
//!
//! The catalog is defined at build time (or loaded once at startup) and never
//! mutated afterwards. Carts and orders refer to products by [`ProductId`]
//! and resolve them here.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Errors that can occur when building a [`Catalog`].
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// The catalog JSON could not be parsed.
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two products share the same id.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
    /// A product id is zero or negative.
    #[error("product id {0} must be positive")]
    InvalidId(ProductId),
    /// A product has a negative price.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
    /// A product price exceeds [`Catalog::MAX_PRICE`].
    #[error("product {0} price exceeds the maximum of {max}", max = Catalog::MAX_PRICE)]
    PriceTooLarge(ProductId),
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub description: String,
    /// Image URL.
    pub image: String,
    /// Alt text for the image.
    #[serde(default)]
    pub image_alt: String,
}

impl Product {
    /// The product price in the store currency.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }

    fn matches_search(&self, needle: &str) -> bool {
        [&self.name, &self.description, &self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// The immutable product catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Highest accepted unit price. Keeps `price × quantity` and cart sums
    /// well inside `Decimal` range.
    pub const MAX_PRICE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 2);

    /// Build a catalog, keeping products in the given (featured) order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on duplicate or non-positive ids, or a
    /// price outside `0..=MAX_PRICE`.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if !product.id.is_positive() {
                return Err(CatalogError::InvalidId(product.id));
            }
            if product.price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice(product.id));
            }
            if product.price > Self::MAX_PRICE {
                return Err(CatalogError::PriceTooLarge(product.id));
            }
            if index.insert(product.id, position).is_some() {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products, index })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON and the validation
    /// errors of [`Catalog::new`] otherwise.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index
            .get(&id)
            .and_then(|&position| self.products.get(position))
    }

    /// Whether the id resolves to a product.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.index.contains_key(&id)
    }

    /// All products in featured order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    /// Filter and sort the catalog for a listing page.
    #[must_use]
    pub fn query(&self, query: &ProductQuery) -> Vec<&Product> {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let category = query
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ProductQuery::ALL_CATEGORIES);

        let mut results: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| needle.as_deref().is_none_or(|n| p.matches_search(n)))
            .filter(|p| category.is_none_or(|c| p.category == c))
            .collect();

        match query.sort {
            SortOrder::Featured => {}
            SortOrder::PriceAsc => results.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceDesc => results.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::Name => results.sort_by_cached_key(|p| p.name.to_lowercase()),
        }

        results
    }
}

/// Listing filters and sort order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductQuery {
    /// Case-insensitive substring over name, description and category.
    pub search: Option<String>,
    /// Exact category, or `all`.
    pub category: Option<String>,
    pub sort: SortOrder,
}

impl ProductQuery {
    /// Category value meaning "no category filter".
    pub const ALL_CATEGORIES: &'static str = "all";
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    /// Case-insensitive name, A to Z.
    Name,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Featured => write!(f, "featured"),
            Self::PriceAsc => write!(f, "price-asc"),
            Self::PriceDesc => write!(f, "price-desc"),
            Self::Name => write!(f, "name"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" | "default" => Ok(Self::Featured),
            "price-asc" | "price-low" => Ok(Self::PriceAsc),
            "price-desc" | "price-high" => Ok(Self::PriceDesc),
            "name" => Ok(Self::Name),
            _ => Err(format!("invalid sort order: {s}")),
        }
    }
}
