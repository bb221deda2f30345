//! Order snapshots.
//!
//! An [`Order`] is built once at checkout from the cart, the catalog and the
//! pricing policy, then appended to the order list. It copies product names
//! and prices so later catalog changes never rewrite history. Fields are
//! private and there are no mutators.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::pricing::{PricingPolicy, Totals};
use crate::types::{CurrencyCode, Email, ProductId, Quantity};

/// Order identifier, e.g. `ORD-1718000000000-K3J9X2QAB`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shipping address captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// Validated customer contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub full_name: String,
    pub email: Email,
    pub phone: String,
    pub address: Address,
}

/// One line of an order, frozen at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: Quantity,
    pub line_total: Decimal,
}

/// An immutable snapshot of a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    created_at: DateTime<Utc>,
    customer: CustomerContact,
    lines: Vec<OrderLine>,
    totals: Totals,
    currency: CurrencyCode,
}

impl Order {
    /// Snapshot the current cart into an order.
    ///
    /// Dangling cart lines are skipped; totals are computed from the lines
    /// that made it into the snapshot.
    #[must_use]
    pub fn snapshot(
        id: OrderId,
        created_at: DateTime<Utc>,
        customer: CustomerContact,
        cart: &Cart,
        catalog: &Catalog,
        policy: &PricingPolicy,
    ) -> Self {
        let lines: Vec<OrderLine> = cart
            .resolve(catalog)
            .into_iter()
            .map(|line| OrderLine {
                product_id: line.product.id,
                name: line.product.name.clone(),
                unit_price: line.product.price,
                quantity: line.quantity,
                line_total: line.line_total,
            })
            .collect();
        let subtotal = lines.iter().map(|line| line.line_total).sum();

        Self {
            id,
            created_at,
            customer,
            lines,
            totals: policy.totals_for_subtotal(subtotal),
            currency: CurrencyCode::default(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.id
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn customer(&self) -> &CustomerContact {
        &self.customer
    }

    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    #[must_use]
    pub const fn totals(&self) -> &Totals {
        &self.totals
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Total units ordered.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity.get()).sum()
    }
}
