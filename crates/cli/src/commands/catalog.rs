//! `shophub catalog`.

use std::fmt::Write;

use shophub_core::{ProductQuery, SortOrder};

use super::Context;

/// Render the filtered catalog as one product per line.
pub fn list(
    ctx: &Context,
    search: Option<String>,
    category: Option<String>,
    sort: SortOrder,
) -> String {
    let catalog = ctx.cart.catalog();
    let query = ProductQuery {
        search,
        category,
        sort,
    };
    let products = catalog.query(&query);

    if products.is_empty() {
        return "No products match.".to_string();
    }

    let mut out = String::new();
    for product in &products {
        let _ = writeln!(
            out,
            "{:>4}  {:<32} {:<12} {:>9}",
            product.id,
            product.name,
            product.category,
            product.unit_price().display()
        );
    }
    let _ = write!(out, "{} product(s)", products.len());
    out
}
