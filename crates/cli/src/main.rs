//! ShopHub CLI - inspect and edit the storefront's cart and order data.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! shophub catalog --category apparel --sort price-asc
//!
//! # Work with the cart
//! shophub cart add 3 --quantity 2
//! shophub cart update 3 5
//! shophub cart show
//!
//! # Review orders
//! shophub orders list
//! shophub orders show ORD-1718000000000-K3J9X2QAB
//! ```
//!
//! Reads the same `STOREFRONT_*` environment variables as the server, so it
//! operates on the server's data directory unless `--data-dir` is given.

#![cfg_attr(not(test), forbid(unsafe_code))]
// Printing results is this binary's job
#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shophub_core::SortOrder;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "shophub")]
#[command(author, version, about = "ShopHub cart and order tools")]
struct Cli {
    /// Data directory (overrides `STOREFRONT_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Catalog {
        /// Case-insensitive search over name, description and category
        #[arg(short, long)]
        search: Option<String>,

        /// Only this category (`all` for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// featured, price-asc, price-desc or name
        #[arg(long, default_value = "featured")]
        sort: SortOrder,
    },
    /// Inspect or edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Inspect placed orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add a product
    Add {
        /// Product id
        product_id: i32,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 removes it)
    Update {
        /// Product id
        product_id: i32,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove {
        /// Product id
        product_id: i32,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List all orders
    List,
    /// Show one order
    Show {
        /// Order id
        id: String,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = Context::load(cli.data_dir)?;

    let output = match cli.command {
        Commands::Catalog {
            search,
            category,
            sort,
        } => commands::catalog::list(&ctx, search, category, sort),
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx),
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&mut ctx, product_id, quantity)?,
            CartAction::Update {
                product_id,
                quantity,
            } => commands::cart::update(&mut ctx, product_id, quantity)?,
            CartAction::Remove { product_id } => commands::cart::remove(&mut ctx, product_id)?,
            CartAction::Clear => commands::cart::clear(&mut ctx),
        },
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&ctx),
            OrdersAction::Show { id } => commands::orders::show(&ctx, &id)?,
        },
    };

    println!("{output}");
    Ok(())
}
