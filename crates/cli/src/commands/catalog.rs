//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! gn-cli catalog list
//! gn-cli catalog search "niacinamide"
//! gn-cli catalog recommend
//! ```

use glownest_core::{CurrencyCode, Price};
use glownest_storefront::api::types::Product;
use glownest_storefront::recommend;
use glownest_storefront::session::Session;

use super::{CommandError, context, session};

fn print_products(products: &[Product], currency: CurrencyCode) {
    for product in products {
        let brand = product.brand.as_deref().unwrap_or("-");
        let stock = if product.is_available {
            "in stock"
        } else {
            "out of stock"
        };
        tracing::info!(
            "{}  {}  {}  {}  ({})",
            product.id,
            brand,
            product.product_name,
            Price::new(product.price, currency).display(),
            stock
        );
    }
    tracing::info!("{} product(s)", products.len());
}

/// List the full catalog.
///
/// # Errors
///
/// Returns an error if configuration is missing or the API request fails.
pub async fn list() -> Result<(), CommandError> {
    let (api, config) = context()?;
    let products = api.catalog(&Session::anonymous()).await?;
    print_products(&products, config.currency);
    Ok(())
}

/// Search the catalog by text.
///
/// # Errors
///
/// Returns an error if configuration is missing or the API request fails.
pub async fn search(query: &str) -> Result<(), CommandError> {
    let (api, config) = context()?;
    let products = api.search_products(&Session::anonymous(), query).await?;
    print_products(&products, config.currency);
    Ok(())
}

/// Show recommendations scored against the signed-in user's wishlist.
///
/// # Errors
///
/// Returns an error if not signed in or an API request fails.
pub async fn recommend() -> Result<(), CommandError> {
    let (api, config) = context()?;
    let session = session()?;

    let wishlist = api.wishlist(&session).await?;
    let catalog = api.catalog(&session).await?;
    let picks = recommend::recommend(&wishlist, &catalog);

    if picks.is_empty() {
        tracing::info!("No recommendations available (empty catalog).");
        return Ok(());
    }
    print_products(&picks, config.currency);
    Ok(())
}
