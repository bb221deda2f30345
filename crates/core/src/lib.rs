//! ShopHub Core - Shared domain types.
//!
//! This crate provides the types used across all ShopHub components:
//! - `storefront` - Cart store, checkout and the JSON HTTP API
//! - `cli` - Command-line access to the same persisted data
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage access, no clocks. Everything here can be tested headlessly.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, quantities and emails
//! - [`catalog`] - Read-only product catalog and listing queries
//! - [`cart`] - Cart lines and the cart collection
//! - [`pricing`] - Tax/shipping policy and derived totals
//! - [`order`] - Immutable order snapshots and customer contact data

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod order;
pub mod pricing;
pub mod types;

pub use cart::{Cart, CartError, CartLine, ResolvedLine};
pub use catalog::{Catalog, CatalogError, Product, ProductQuery, SortOrder};
pub use order::{Address, CustomerContact, Order, OrderId, OrderLine};
pub use pricing::{PricingPolicy, Totals};
pub use types::*;
