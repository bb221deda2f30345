//! Product catalog loading.
//!
//! The storefront ships with a built-in catalog. An operator may point
//! `STOREFRONT_CATALOG_PATH` at a JSON file with the same shape instead.

use std::path::{Path, PathBuf};

use shophub_core::{Catalog, CatalogError};
use thiserror::Error;

/// The catalog compiled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../catalog/products.json");

/// Errors loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
}

/// The built-in catalog.
///
/// # Errors
///
/// Returns `CatalogError` if the embedded JSON is invalid.
pub fn builtin() -> Result<Catalog, CatalogError> {
    Catalog::from_json(BUILTIN_CATALOG)
}

/// Load the catalog from `path`, or the built-in one when `None`.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the file cannot be read or is not a valid
/// catalog.
pub fn load(path: Option<&Path>) -> Result<Catalog, CatalogLoadError> {
    let Some(path) = path else {
        return builtin().map_err(|source| CatalogLoadError::Invalid {
            path: PathBuf::from("<builtin>"),
            source,
        });
    };

    let raw = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = Catalog::from_json(&raw).map_err(|source| CatalogLoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), products = catalog.len(), "Loaded catalog");
    Ok(catalog)
}
