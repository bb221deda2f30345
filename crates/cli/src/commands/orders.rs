//! `shophub orders`.

use std::fmt::Write;

use shophub_core::{Order, Price};

use super::{CommandError, Context};

fn summary(order: &Order) -> String {
    format!(
        "{}  {}  {} item(s)  {}  {}",
        order.id(),
        order.created_at().format("%Y-%m-%d %H:%M"),
        order.item_count(),
        Price::usd(order.totals().total),
        order.customer().email
    )
}

/// One summary line per order, oldest first.
pub fn list(ctx: &Context) -> String {
    let orders = ctx.orders.list();
    if orders.is_empty() {
        return "No orders yet.".to_string();
    }
    orders.iter().map(summary).collect::<Vec<_>>().join("\n")
}

/// Full detail for one order.
///
/// # Errors
///
/// Returns `CommandError::OrderNotFound` for an unknown id.
pub fn show(ctx: &Context, id: &str) -> Result<String, CommandError> {
    let order = ctx
        .orders
        .find(id)
        .ok_or_else(|| CommandError::OrderNotFound(id.to_string()))?;

    let customer = order.customer();
    let address = &customer.address;
    let mut out = String::new();
    let _ = writeln!(out, "Order {}", order.id());
    let _ = writeln!(out, "Placed:   {}", order.created_at().to_rfc3339());
    let _ = writeln!(out, "Customer: {} <{}> {}", customer.full_name, customer.email, customer.phone);
    let _ = writeln!(
        out,
        "Ship to:  {}, {}, {} {}, {}",
        address.street, address.city, address.state, address.zip, address.country
    );
    for line in order.lines() {
        let _ = writeln!(
            out,
            "  {:>4}  {:<32} x{:<4} {:>10}",
            line.product_id,
            line.name,
            line.quantity,
            Price::usd(line.line_total)
        );
    }
    let totals = order.totals();
    let _ = write!(
        out,
        "Subtotal {}  Tax {}  Shipping {}  Total {}",
        Price::usd(totals.subtotal),
        Price::usd(totals.tax),
        Price::usd(totals.shipping),
        Price::usd(totals.total)
    );
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shophub_core::ProductId;
    use shophub_storefront::checkout::{CheckoutForm, submit};

    use super::*;
    use crate::commands::tests::temp_context;

    #[test]
    fn test_list_and_show() {
        let (_tmp, mut ctx) = temp_context();
        assert_eq!(list(&ctx), "No orders yet.");

        ctx.cart.add_item(ProductId::new(11), 1);
        let form = CheckoutForm {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-123-4567".to_string(),
            street: "1 Analytical Way".to_string(),
            city: "London".to_string(),
            state: "LN".to_string(),
            zip: "12345".to_string(),
            country: None,
        };
        let id = submit(&mut ctx.cart, &ctx.orders, &form).unwrap();

        let listing = list(&ctx);
        assert!(listing.starts_with(id.as_str()));
        assert!(listing.contains("ada@example.com"));

        let detail = show(&ctx, id.as_str()).unwrap();
        assert!(detail.contains("USB-C Fast Charging Cable"));
        assert!(detail.contains("Total $31.99"));
    }

    #[test]
    fn test_show_unknown() {
        let (_tmp, ctx) = temp_context();
        assert!(matches!(
            show(&ctx, "ORD-0-NOPE"),
            Err(CommandError::OrderNotFound(_))
        ));
    }
}
