//! The persisted cart.
//!
//! [`CartStore`] wraps a [`Storage`] backend and the catalog. Every operation
//! reads the cart blob, applies the change and writes it back. Storage
//! failures are logged and swallowed: the worst case is an empty cart.

use std::sync::Arc;
use std::time::{Duration, Instant};

use shophub_core::{
    Cart, CartLine, Catalog, PricingPolicy, ProductId, Quantity, ResolvedLine, Totals,
};

use crate::storage::{self, Storage, StorageKeys};

/// How long a removed line stays restorable by default.
pub const DEFAULT_UNDO_WINDOW: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
struct RemovedLine {
    position: usize,
    line: CartLine,
    removed_at: Instant,
}

/// Cart operations over injected storage.
#[derive(Debug)]
pub struct CartStore {
    storage: Arc<dyn Storage>,
    catalog: Arc<Catalog>,
    policy: PricingPolicy,
    keys: StorageKeys,
    undo_window: Duration,
    last_removed: Option<RemovedLine>,
}

impl CartStore {
    #[must_use]
    pub fn new(
        storage: Arc<dyn Storage>,
        catalog: Arc<Catalog>,
        policy: PricingPolicy,
        keys: StorageKeys,
    ) -> Self {
        Self {
            storage,
            catalog,
            policy,
            keys,
            undo_window: DEFAULT_UNDO_WINDOW,
            last_removed: None,
        }
    }

    /// Override how long [`CartStore::undo_remove`] accepts a removal.
    #[must_use]
    pub const fn with_undo_window(mut self, window: Duration) -> Self {
        self.undo_window = window;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Load the persisted cart.
    ///
    /// Corrupt blobs are discarded and lines for products no longer in the
    /// catalog are dropped.
    #[must_use]
    pub fn get_cart(&self) -> Cart {
        let mut cart: Cart = storage::load_json(
            self.storage.as_ref(),
            &self.keys.cart,
            Some(StorageKeys::LEGACY_CART),
        );
        let dropped = cart.retain_resolvable(&self.catalog);
        if dropped > 0 {
            tracing::debug!(dropped, "Dropped cart lines for unknown products");
        }
        cart
    }

    /// Persist `cart`. Failures are logged, not returned.
    pub fn save_cart(&self, cart: &Cart) {
        if let Err(e) = storage::store_json(self.storage.as_ref(), &self.keys.cart, cart) {
            tracing::warn!(error = %e, "Failed to save cart");
        }
    }

    /// Add `quantity` of a product, merging with an existing line.
    ///
    /// A quantity of zero counts as one. Returns `false` (and changes nothing)
    /// if the product is not in the catalog.
    pub fn add_item(&mut self, id: ProductId, quantity: u32) -> bool {
        if !self.catalog.contains(id) {
            tracing::debug!(product_id = %id, "Ignoring add for unknown product");
            return false;
        }
        let quantity = Quantity::clamped(quantity).unwrap_or(Quantity::ONE);

        let mut cart = self.get_cart();
        cart.add(id, quantity);
        self.save_cart(&cart);
        true
    }

    /// Set a line's quantity, clamped to the maximum.
    ///
    /// Zero or less removes the line exactly like [`CartStore::remove_item`].
    /// Does nothing if the product has no line.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        let mut cart = self.get_cart();
        if cart.set_quantity(id, quantity) {
            self.save_cart(&cart);
        }
    }

    /// Remove a product's line, keeping it restorable for the undo window.
    ///
    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, id: ProductId) -> bool {
        let mut cart = self.get_cart();
        let Some((position, line)) = cart.remove(id) else {
            return false;
        };
        self.save_cart(&cart);
        self.last_removed = Some(RemovedLine {
            position,
            line,
            removed_at: Instant::now(),
        });
        true
    }

    /// Whether a removed line can currently be restored.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.last_removed
            .is_some_and(|removed| removed.removed_at.elapsed() < self.undo_window)
    }

    /// Restore the most recently removed line.
    ///
    /// The line goes back to its former position, or merges into the
    /// product's line if it was re-added since. The retained line is consumed
    /// whether or not the window has elapsed. Returns whether anything was
    /// restored.
    pub fn undo_remove(&mut self) -> bool {
        let Some(removed) = self.last_removed.take() else {
            return false;
        };
        if removed.removed_at.elapsed() >= self.undo_window {
            tracing::debug!(product_id = %removed.line.id, "Undo window elapsed");
            return false;
        }

        let mut cart = self.get_cart();
        cart.restore(removed.position, removed.line);
        self.save_cart(&cart);
        true
    }

    /// Empty the cart and forget any removed line.
    pub fn clear(&mut self) {
        self.last_removed = None;
        self.save_cart(&Cart::new());
    }

    /// Totals for the current cart.
    #[must_use]
    pub fn compute_totals(&self) -> Totals {
        self.policy.totals(&self.get_cart(), &self.catalog)
    }

    /// Total units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.get_cart().item_count()
    }

    /// Cart lines joined with their products.
    #[must_use]
    pub fn detailed_lines(&self) -> Vec<ResolvedLine<'_>> {
        self.get_cart().resolve(&self.catalog)
    }
}
