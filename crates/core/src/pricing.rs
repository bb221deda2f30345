//! Tax and shipping policy, and the totals derived from a cart.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::catalog::Catalog;

/// Store-wide pricing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Fraction of the subtotal charged as tax (e.g. `0.10`).
    pub tax_rate: Decimal,
    /// Flat shipping fee for non-empty carts at or below the threshold.
    pub shipping_fee: Decimal,
    /// Shipping is free when the subtotal is strictly above this.
    pub free_shipping_threshold: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(10, 2),
            shipping_fee: Decimal::new(1000, 2),
            free_shipping_threshold: Decimal::from(100),
        }
    }
}

impl PricingPolicy {
    /// Shipping charged for a given subtotal.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal <= Decimal::ZERO || subtotal > self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.shipping_fee
        }
    }

    /// Tax on a subtotal, rounded to cents (half away from zero).
    #[must_use]
    pub fn tax_for(&self, subtotal: Decimal) -> Decimal {
        (subtotal * self.tax_rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Totals for an already-computed subtotal.
    #[must_use]
    pub fn totals_for_subtotal(&self, subtotal: Decimal) -> Totals {
        let tax = self.tax_for(subtotal);
        let shipping = self.shipping_for(subtotal);
        Totals {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }

    /// Totals for a cart. Lines that don't resolve in the catalog contribute nothing.
    #[must_use]
    pub fn totals(&self, cart: &Cart, catalog: &Catalog) -> Totals {
        self.totals_for_subtotal(cart.subtotal(catalog))
    }
}

/// Derived cart totals. Never persisted on its own; orders embed a copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl Totals {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.subtotal.is_zero()
            && self.tax.is_zero()
            && self.shipping.is_zero()
            && self.total.is_zero()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::types::{ProductId, Quantity};

    fn cart_of(lines: &[(i32, u32)]) -> Cart {
        let mut cart = Cart::new();
        for &(id, n) in lines {
            cart.add(ProductId::new(id), Quantity::new(n).unwrap());
        }
        cart
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let totals = PricingPolicy::default().totals(&Cart::new(), &sample_catalog());
        assert!(totals.is_zero());
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_flat_shipping_at_or_below_threshold() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.shipping_for(Decimal::from(100)), Decimal::new(1000, 2));
        assert_eq!(policy.shipping_for(Decimal::new(2499, 2)), Decimal::new(1000, 2));
    }

    #[test]
    fn test_free_shipping_above_threshold() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.shipping_for(Decimal::new(10001, 2)), Decimal::ZERO);
    }

    #[test]
    fn test_totals_small_cart() {
        // One T-shirt: 24.99, tax 2.499 -> 2.50, shipping 10.00
        let totals = PricingPolicy::default().totals(&cart_of(&[(2, 1)]), &sample_catalog());
        assert_eq!(totals.subtotal, Decimal::new(2499, 2));
        assert_eq!(totals.tax, Decimal::new(250, 2));
        assert_eq!(totals.shipping, Decimal::new(1000, 2));
        assert_eq!(totals.total, Decimal::new(3749, 2));
    }

    #[test]
    fn test_totals_large_cart_ships_free() {
        // Headphones 149.99 + shoes 89.99 = 239.98, tax 24.00
        let totals =
            PricingPolicy::default().totals(&cart_of(&[(3, 1), (1, 1)]), &sample_catalog());
        assert_eq!(totals.subtotal, Decimal::new(23998, 2));
        assert_eq!(totals.tax, Decimal::new(2400, 2));
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::new(26398, 2));
    }

    #[test]
    fn test_custom_policy() {
        let policy = PricingPolicy {
            tax_rate: Decimal::new(7, 2),
            shipping_fee: Decimal::new(599, 2),
            free_shipping_threshold: Decimal::from(50),
        };
        let totals = policy.totals_for_subtotal(Decimal::new(4000, 2));
        assert_eq!(totals.tax, Decimal::new(280, 2));
        assert_eq!(totals.shipping, Decimal::new(599, 2));
        assert_eq!(totals.total, Decimal::new(4879, 2));
    }

    #[test]
    fn test_dangling_lines_contribute_nothing() {
        let totals = PricingPolicy::default().totals(&cart_of(&[(99, 4)]), &sample_catalog());
        assert!(totals.is_zero());
    }
}
