//! GlowNest CLI - storefront management and smoke-test tools.
//!
//! # Usage
//!
//! ```bash
//! # Sign in and print a JWT for the other commands
//! gn-cli login -e ada@example.com
//!
//! # Browse the catalog
//! gn-cli catalog list
//! gn-cli catalog search "vitamin c serum"
//! gn-cli catalog recommend
//!
//! # Manage the cart
//! gn-cli cart show
//! gn-cli cart add <product-id> -q 2
//!
//! # Wishlist and orders
//! gn-cli wishlist toggle <product-id>
//! gn-cli orders list
//! ```
//!
//! Authenticated commands read the JWT from the `GLOWNEST_JWT` environment
//! variable.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gn-cli")]
#[command(author, version, about = "GlowNest CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and print a JWT
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the signed-in user's cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the signed-in user's wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Inspect the signed-in user's orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List the full catalog
    List,
    /// Search the catalog by text
    Search {
        /// Search query
        query: String,
    },
    /// Show recommendations based on the wishlist
    Recommend,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart line
    Set {
        /// Product id
        product_id: String,

        /// New quantity
        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        product_id: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show the wishlist
    Show,
    /// Add or remove a product
    Toggle {
        /// Product id
        product_id: String,
    },
    /// Clear the whole wishlist
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List order history
    List,
    /// Show a single order
    Show {
        /// Order id
        order_id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Login { email } => commands::account::login(&email).await?,
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list().await?,
            CatalogAction::Search { query } => commands::catalog::search(&query).await?,
            CatalogAction::Recommend => commands::catalog::recommend().await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show().await?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&product_id, quantity).await?,
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set_quantity(&product_id, quantity).await?,
            CartAction::Remove { product_id } => commands::cart::remove(&product_id).await?,
            CartAction::Clear => commands::cart::clear().await?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show().await?,
            WishlistAction::Toggle { product_id } => {
                commands::wishlist::toggle(&product_id).await?;
            }
            WishlistAction::Clear => commands::wishlist::clear().await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list().await?,
            OrdersAction::Show { order_id } => commands::orders::show(&order_id).await?,
        },
    }
    Ok(())
}
