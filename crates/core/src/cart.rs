//! Cart lines and the cart collection.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s with at most one line per
//! product. It knows nothing about storage; see the storefront's `CartStore`
//! for persistence.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::types::{ProductId, Quantity};

/// Errors raised when a deserialized cart violates its invariants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// More than one line references the same product.
    #[error("duplicate cart line for product {0}")]
    DuplicateLine(ProductId),
}

/// One product/quantity pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub quantity: Quantity,
}

impl CartLine {
    #[must_use]
    pub const fn new(id: ProductId, quantity: Quantity) -> Self {
        Self { id, quantity }
    }
}

/// A cart line joined with its catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLine<'a> {
    pub product: &'a Product,
    pub quantity: Quantity,
    /// `price × quantity`, exact.
    pub line_total: Decimal,
}

/// Ordered collection of cart lines, unique by product id.
///
/// Serializes as a bare JSON array of `{id, quantity}` objects.
/// Deserialization rejects duplicate product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The line for a product, if any.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.lines.iter().position(|line| line.id == id)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity.get()).sum()
    }

    /// Merge `quantity` into the product's line, or append a new line.
    ///
    /// Merged quantities saturate at [`Quantity::MAX`].
    pub fn add(&mut self, id: ProductId, quantity: Quantity) {
        match self.lines.iter_mut().find(|line| line.id == id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine::new(id, quantity)),
        }
    }

    /// Set a line's quantity, clamping to `[0, MAX]`; zero removes the line.
    ///
    /// Returns `false` if the product had no line (nothing changes).
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        match Quantity::clamped(quantity) {
            Some(q) => {
                if let Some(line) = self.lines.get_mut(position) {
                    line.quantity = q;
                }
            }
            None => {
                self.lines.remove(position);
            }
        }
        true
    }

    /// Remove a product's line, returning it with its former position.
    pub fn remove(&mut self, id: ProductId) -> Option<(usize, CartLine)> {
        let position = self.position(id)?;
        Some((position, self.lines.remove(position)))
    }

    /// Put a line back at `position` (clamped to the end).
    ///
    /// If the product already has a line, the quantities merge instead.
    pub fn restore(&mut self, position: usize, line: CartLine) {
        if self.get(line.id).is_some() {
            self.add(line.id, line.quantity);
        } else {
            let position = position.min(self.lines.len());
            self.lines.insert(position, line);
        }
    }

    /// Drop lines whose product no longer exists. Returns how many were dropped.
    pub fn retain_resolvable(&mut self, catalog: &Catalog) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| catalog.contains(line.id));
        before - self.lines.len()
    }

    /// Join lines with their products, silently skipping dangling ids.
    #[must_use]
    pub fn resolve<'a>(&self, catalog: &'a Catalog) -> Vec<ResolvedLine<'a>> {
        self.lines
            .iter()
            .filter_map(|line| {
                catalog.get(line.id).map(|product| ResolvedLine {
                    product,
                    quantity: line.quantity,
                    line_total: product.price * Decimal::from(line.quantity.get()),
                })
            })
            .collect()
    }

    /// Sum of `price × quantity` over resolvable lines.
    #[must_use]
    pub fn subtotal(&self, catalog: &Catalog) -> Decimal {
        self.resolve(catalog)
            .iter()
            .map(|line| line.line_total)
            .sum()
    }
}

impl TryFrom<Vec<CartLine>> for Cart {
    type Error = CartError;

    fn try_from(lines: Vec<CartLine>) -> Result<Self, Self::Error> {
        for (i, line) in lines.iter().enumerate() {
            if lines.iter().skip(i + 1).any(|other| other.id == line.id) {
                return Err(CartError::DuplicateLine(line.id));
            }
        }
        Ok(Self { lines })
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
