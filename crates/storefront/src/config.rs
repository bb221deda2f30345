//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Directory holding the cart and order files (default: data)
//! - `STOREFRONT_NAMESPACE` - Storage key prefix (default: shophub)
//! - `STOREFRONT_CATALOG_PATH` - Product catalog JSON (default: built-in catalog)
//! - `STOREFRONT_TAX_RATE` - Tax as a fraction of the subtotal (default: 0.10)
//! - `STOREFRONT_SHIPPING_FEE` - Flat shipping fee (default: 10.00)
//! - `STOREFRONT_FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is free (default: 100.00)
//! - `STOREFRONT_UNDO_WINDOW_SECS` - How long a removed cart line can be restored (default: 5)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use shophub_core::PricingPolicy;
use thiserror::Error;

use crate::cart_store::DEFAULT_UNDO_WINDOW;
use crate::storage::StorageKeys;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory for file-backed storage
    pub data_dir: PathBuf,
    /// Prefix for persisted keys
    pub namespace: String,
    /// Catalog override; `None` uses the built-in catalog
    pub catalog_path: Option<PathBuf>,
    /// Tax and shipping rules
    pub pricing: PricingPolicy,
    /// Undo window for removed cart lines
    pub undo_window: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            data_dir: PathBuf::from("data"),
            namespace: "shophub".to_string(),
            catalog_path: None,
            pricing: PricingPolicy::default(),
            undo_window: DEFAULT_UNDO_WINDOW,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Unset or empty variables fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);
        let defaults = Self::default();

        let tax_rate = env.parse("STOREFRONT_TAX_RATE", defaults.pricing.tax_rate)?;
        if !(Decimal::ZERO..=Decimal::ONE).contains(&tax_rate) {
            return Err(invalid("STOREFRONT_TAX_RATE", "must be between 0 and 1"));
        }
        let shipping_fee = env.parse("STOREFRONT_SHIPPING_FEE", defaults.pricing.shipping_fee)?;
        if shipping_fee < Decimal::ZERO {
            return Err(invalid("STOREFRONT_SHIPPING_FEE", "must not be negative"));
        }
        let free_shipping_threshold = env.parse(
            "STOREFRONT_FREE_SHIPPING_THRESHOLD",
            defaults.pricing.free_shipping_threshold,
        )?;
        if free_shipping_threshold < Decimal::ZERO {
            return Err(invalid(
                "STOREFRONT_FREE_SHIPPING_THRESHOLD",
                "must not be negative",
            ));
        }

        let namespace = env
            .optional("STOREFRONT_NAMESPACE")
            .unwrap_or(defaults.namespace);
        if namespace.starts_with('.')
            || !namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        {
            return Err(invalid(
                "STOREFRONT_NAMESPACE",
                "may only contain letters, digits, '.', '-' and '_'",
            ));
        }

        Ok(Self {
            host: env.parse("STOREFRONT_HOST", defaults.host)?,
            port: env.parse("STOREFRONT_PORT", defaults.port)?,
            data_dir: env
                .optional("STOREFRONT_DATA_DIR")
                .map_or(defaults.data_dir, PathBuf::from),
            namespace,
            catalog_path: env.optional("STOREFRONT_CATALOG_PATH").map(PathBuf::from),
            pricing: PricingPolicy {
                tax_rate,
                shipping_fee,
                free_shipping_threshold,
            },
            undo_window: Duration::from_secs(
                env.parse("STOREFRONT_UNDO_WINDOW_SECS", defaults.undo_window.as_secs())?,
            ),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Persisted keys for the configured namespace.
    #[must_use]
    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::new(&self.namespace)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}
