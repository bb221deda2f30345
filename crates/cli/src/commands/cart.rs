//! `shophub cart`.

use std::fmt::Write;

use shophub_core::{Price, ProductId};

use super::{CommandError, Context};

/// Render the cart with totals.
pub fn show(ctx: &Context) -> String {
    let lines = ctx.cart.detailed_lines();
    if lines.is_empty() {
        return "Cart is empty.".to_string();
    }

    let mut out = String::new();
    for line in &lines {
        let _ = writeln!(
            out,
            "{:>4}  {:<32} x{:<4} {:>10}",
            line.product.id,
            line.product.name,
            line.quantity,
            Price::usd(line.line_total).display()
        );
    }

    let totals = ctx.cart.compute_totals();
    let _ = writeln!(out, "Subtotal: {}", Price::usd(totals.subtotal));
    let _ = writeln!(out, "Tax:      {}", Price::usd(totals.tax));
    let _ = writeln!(out, "Shipping: {}", Price::usd(totals.shipping));
    let _ = write!(out, "Total:    {}", Price::usd(totals.total));
    out
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns `CommandError::UnknownProduct` if the id is not in the catalog.
pub fn add(ctx: &mut Context, product_id: i32, quantity: u32) -> Result<String, CommandError> {
    if !ctx.cart.add_item(ProductId::new(product_id), quantity) {
        return Err(CommandError::UnknownProduct(product_id));
    }
    Ok(format!(
        "Added product {product_id}. Cart has {} item(s).",
        ctx.cart.item_count()
    ))
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns `CommandError::NotInCart` if the product has no line.
pub fn update(ctx: &mut Context, product_id: i32, quantity: i64) -> Result<String, CommandError> {
    let id = ProductId::new(product_id);
    if ctx.cart.get_cart().get(id).is_none() {
        return Err(CommandError::NotInCart(product_id));
    }
    ctx.cart.update_quantity(id, quantity);
    Ok(format!(
        "Updated product {product_id}. Cart has {} item(s).",
        ctx.cart.item_count()
    ))
}

/// Remove a line.
///
/// # Errors
///
/// Returns `CommandError::NotInCart` if the product has no line.
pub fn remove(ctx: &mut Context, product_id: i32) -> Result<String, CommandError> {
    if !ctx.cart.remove_item(ProductId::new(product_id)) {
        return Err(CommandError::NotInCart(product_id));
    }
    Ok(format!("Removed product {product_id}."))
}

/// Empty the cart.
pub fn clear(ctx: &mut Context) -> String {
    ctx.cart.clear();
    "Cart cleared.".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::tests::temp_context;

    #[test]
    fn test_add_update_show() {
        let (_tmp, mut ctx) = temp_context();
        assert_eq!(show(&ctx), "Cart is empty.");

        add(&mut ctx, 4, 2).unwrap();
        update(&mut ctx, 4, 3).unwrap();

        let out = show(&ctx);
        assert!(out.contains("Cotton Casual T-Shirt"));
        assert!(out.contains("x3"));
        assert!(out.contains("Subtotal: $74.97"));
        assert!(out.contains("Shipping: $10.00"));
        assert!(out.ends_with("Total:    $92.47"));
    }

    #[test]
    fn test_errors() {
        let (_tmp, mut ctx) = temp_context();
        assert!(matches!(
            add(&mut ctx, 404, 1),
            Err(CommandError::UnknownProduct(404))
        ));
        assert!(matches!(
            update(&mut ctx, 1, 2),
            Err(CommandError::NotInCart(1))
        ));
        assert!(matches!(remove(&mut ctx, 1), Err(CommandError::NotInCart(1))));
    }

    #[test]
    fn test_remove_and_clear() {
        let (_tmp, mut ctx) = temp_context();
        add(&mut ctx, 1, 1).unwrap();
        add(&mut ctx, 2, 1).unwrap();

        remove(&mut ctx, 1).unwrap();
        assert_eq!(ctx.cart.item_count(), 1);

        clear(&mut ctx);
        assert_eq!(show(&ctx), "Cart is empty.");
    }
}
