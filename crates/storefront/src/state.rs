//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use shophub_core::Catalog;

use crate::cart_store::CartStore;
use crate::catalog::{self, CatalogLoadError};
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::orders::OrderBook;
use crate::storage::{FileStorage, Storage};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The cart store sits behind a
/// mutex so each request's read-modify-write runs alone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    cart: Mutex<CartStore>,
    orders: OrderBook,
}

impl AppState {
    /// Create application state over an explicit storage backend.
    #[must_use]
    pub fn new(config: StorefrontConfig, storage: Arc<dyn Storage>, catalog: Arc<Catalog>) -> Self {
        let keys = config.storage_keys();
        let cart = CartStore::new(
            Arc::clone(&storage),
            Arc::clone(&catalog),
            config.pricing,
            keys.clone(),
        )
        .with_undo_window(config.undo_window);
        let orders = OrderBook::new(storage, keys);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: Mutex::new(cart),
                orders,
            }),
        }
    }

    /// Create application state with file storage in the configured data
    /// directory and the configured catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, CatalogLoadError> {
        let catalog = catalog::load(config.catalog_path.as_deref())?;
        let storage = FileStorage::new(config.data_dir.clone());
        tracing::info!(
            data_dir = %storage.dir().display(),
            namespace = %config.namespace,
            products = catalog.len(),
            "Storefront state initialized"
        );
        Ok(Self::new(config, Arc::new(storage), Arc::new(catalog)))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the order list.
    #[must_use]
    pub fn orders(&self) -> &OrderBook {
        &self.inner.orders
    }

    /// Lock the cart store for the duration of one request.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if a previous holder panicked.
    pub fn cart(&self) -> Result<MutexGuard<'_, CartStore>, AppError> {
        self.inner
            .cart
            .lock()
            .map_err(|_| AppError::Internal("Cart lock poisoned".to_string()))
    }
}
