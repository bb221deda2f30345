//! CLI subcommands.
//!
//! Each command returns the text to print so it can be tested without
//! capturing stdout.

pub mod cart;
pub mod catalog;
pub mod orders;

use std::path::PathBuf;
use std::sync::Arc;

use shophub_storefront::catalog::{self as catalog_loader, CatalogLoadError};
use shophub_storefront::{
    CartStore, ConfigError, FileStorage, OrderBook, Storage, StorefrontConfig,
};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogLoadError),

    /// No product with this id.
    #[error("Unknown product: {0}")]
    UnknownProduct(i32),

    /// The product has no line in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(i32),

    /// No order with this id.
    #[error("Order not found: {0}")]
    OrderNotFound(String),
}

/// Stores opened over the configured data directory.
pub struct Context {
    pub cart: CartStore,
    pub orders: OrderBook,
}

impl Context {
    /// Open the stores described by the environment, optionally overriding
    /// the data directory.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if configuration or the catalog fail to load.
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self, CommandError> {
        let mut config = StorefrontConfig::from_env()?;
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        Self::from_config(&config)
    }

    /// Open the stores for an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Catalog` if the catalog fails to load.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, CommandError> {
        let catalog = Arc::new(catalog_loader::load(config.catalog_path.as_deref())?);
        let files = FileStorage::new(config.data_dir.clone());
        tracing::debug!(data_dir = %files.dir().display(), "Opened data directory");
        let storage: Arc<dyn Storage> = Arc::new(files);
        let keys = config.storage_keys();

        Ok(Self {
            cart: CartStore::new(Arc::clone(&storage), catalog, config.pricing, keys.clone()),
            orders: OrderBook::new(storage, keys),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// A context over a fresh temporary data directory.
    pub(crate) fn temp_context() -> (tempfile::TempDir, Context) {
        let tmp = tempfile::tempdir().unwrap();
        let config = StorefrontConfig {
            data_dir: tmp.path().to_path_buf(),
            ..StorefrontConfig::default()
        };
        let ctx = Context::from_config(&config).unwrap();
        (tmp, ctx)
    }

    #[test]
    fn test_context_shares_data_directory() {
        let (tmp, mut ctx) = temp_context();
        ctx.cart.add_item(shophub_core::ProductId::new(1), 1);

        let config = StorefrontConfig {
            data_dir: tmp.path().to_path_buf(),
            ..StorefrontConfig::default()
        };
        let reopened = Context::from_config(&config).unwrap();
        assert_eq!(reopened.cart.item_count(), 1);
        assert!(tmp.path().join("shophub.cart.json").exists());
    }
}
