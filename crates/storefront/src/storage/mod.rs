//! Key-value persistence for the cart and order list.
//!
//! Everything the storefront persists is a JSON string stored under a
//! namespaced key. [`Storage`] is the seam: [`MemoryStorage`] backs tests and
//! ephemeral runs, [`FileStorage`] keeps one file per key on disk.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage backend errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped onto the backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// The stored bytes are not a readable value (e.g. invalid UTF-8).
    #[error("Corrupt value for key {key}")]
    Corrupt { key: String },

    /// A value could not be serialized.
    #[error("Serialization error for key {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// An in-memory lock was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// A string key-value store.
///
/// Implementations must be safe to share between request handlers.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Read a value. `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// The persisted keys for one application namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub cart: String,
    pub orders: String,
}

impl StorageKeys {
    /// Un-namespaced cart key written by earlier builds.
    pub const LEGACY_CART: &'static str = "cart";
    /// Un-namespaced order key written by earlier builds.
    pub const LEGACY_ORDERS: &'static str = "orders";

    #[must_use]
    pub fn new(namespace: &str) -> Self {
        Self {
            cart: format!("{namespace}.cart"),
            orders: format!("{namespace}.orders"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new("shophub")
    }
}

/// Read and parse a JSON value, falling back to `T::default()`.
///
/// Lenient form of [`try_load_json`]: storage failures are logged and the
/// default is returned.
pub(crate) fn load_json<T>(storage: &dyn Storage, key: &str, legacy_key: Option<&str>) -> T
where
    T: DeserializeOwned + Serialize + Default,
{
    try_load_json(storage, key, legacy_key).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "Failed to read from storage");
        T::default()
    })
}

/// Read and parse a JSON value.
///
/// An absent key yields `T::default()`. A blob that fails to parse is
/// treated as corrupt: it is logged, removed, and the default is returned.
/// When `key` is absent and `legacy_key` holds a valid value, that value is
/// moved under `key`.
///
/// # Errors
///
/// Returns `StorageError` if the backend cannot be read, so callers that
/// rewrite the value never replace data they failed to see.
pub(crate) fn try_load_json<T>(
    storage: &dyn Storage,
    key: &str,
    legacy_key: Option<&str>,
) -> Result<T, StorageError>
where
    T: DeserializeOwned + Serialize + Default,
{
    match read_raw(storage, key)? {
        Some(raw) => Ok(parse_or_discard(storage, key, &raw)),
        None => match legacy_key {
            Some(legacy) => migrate(storage, legacy, key),
            None => Ok(T::default()),
        },
    }
}

/// `get`, with unreadable bytes reported as an empty blob so they go
/// through the corrupt-value path.
fn read_raw(storage: &dyn Storage, key: &str) -> Result<Option<String>, StorageError> {
    match storage.get(key) {
        Err(StorageError::Corrupt { .. }) => Ok(Some(String::new())),
        other => other,
    }
}

/// Serialize and write a JSON value.
pub(crate) fn store_json<T: Serialize>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    storage.set(key, &raw)
}

fn parse_or_discard<T: DeserializeOwned + Default>(storage: &dyn Storage, key: &str, raw: &str) -> T {
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding corrupt value");
            if let Err(e) = storage.remove(key) {
                tracing::warn!(key, error = %e, "Failed to remove corrupt value");
            }
            T::default()
        }
    }
}

fn migrate<T>(storage: &dyn Storage, legacy_key: &str, key: &str) -> Result<T, StorageError>
where
    T: DeserializeOwned + Serialize + Default,
{
    let Some(raw) = read_raw(storage, legacy_key)? else {
        return Ok(T::default());
    };

    let value: T = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(_) => return Ok(parse_or_discard(storage, legacy_key, &raw)),
    };
    match store_json(storage, key, &value) {
        Ok(()) => {
            if let Err(e) = storage.remove(legacy_key) {
                tracing::warn!(key = legacy_key, error = %e, "Failed to remove legacy key");
            }
            tracing::info!(from = legacy_key, to = key, "Migrated legacy storage key");
        }
        Err(e) => tracing::warn!(key, error = %e, "Failed to migrate legacy storage key"),
    }
    Ok(value)
}
