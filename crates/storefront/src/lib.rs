//! ShopHub storefront library.
//!
//! The cart and order store behind the ShopHub demo storefront, plus the JSON
//! HTTP API that exposes it. The binary in `main.rs` and the `shophub` CLI
//! are thin shells over this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart_store;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod middleware;
pub mod orders;
pub mod routes;
pub mod state;
pub mod storage;

pub use cart_store::CartStore;
pub use checkout::{CheckoutError, CheckoutForm, FieldErrors};
pub use config::{ConfigError, StorefrontConfig};
pub use error::AppError;
pub use orders::OrderBook;
pub use state::AppState;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageKeys};
