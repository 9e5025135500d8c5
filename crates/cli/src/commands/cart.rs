//! Cart management commands.
//!
//! All cart commands require `GLOWNEST_JWT`.

use glownest_core::{CurrencyCode, Price, ProductId};
use glownest_storefront::api::types::CartLine;
use glownest_storefront::checkout::Totals;

use super::{CommandError, context, session};

fn print_cart(lines: &[CartLine], currency: CurrencyCode) {
    if lines.is_empty() {
        tracing::info!("Cart is empty.");
        return;
    }
    let money = |amount| Price::new(amount, currency).display();
    for line in lines {
        tracing::info!(
            "{}  {} x{}  @ {}",
            line.product_id,
            line.product_name,
            line.quantity,
            money(line.price)
        );
    }
    let totals = Totals::from_lines(lines);
    tracing::info!("Subtotal: {}", money(totals.subtotal));
    tracing::info!("Shipping: {}", money(totals.shipping));
    tracing::info!("Tax:      {}", money(totals.tax));
    tracing::info!("Total:    {}", money(totals.total));
}

/// Show the cart with totals.
///
/// # Errors
///
/// Returns an error if not signed in or the API request fails.
pub async fn show() -> Result<(), CommandError> {
    let (api, config) = context()?;
    let session = session()?;
    let lines = api.cart(&session).await?;
    print_cart(&lines, config.currency);
    Ok(())
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns an error if not signed in or the API request fails.
pub async fn add(product_id: &str, quantity: u32) -> Result<(), CommandError> {
    let (api, config) = context()?;
    let session = session()?;
    let lines = api
        .add_to_cart(&session, &ProductId::new(product_id), quantity)
        .await?;
    print_cart(&lines, config.currency);
    Ok(())
}

/// Set the quantity of a cart line.
///
/// # Errors
///
/// Returns an error if not signed in or the API request fails.
pub async fn set_quantity(product_id: &str, quantity: u32) -> Result<(), CommandError> {
    let (api, config) = context()?;
    let session = session()?;
    let lines = api
        .set_cart_quantity(&session, &ProductId::new(product_id), quantity)
        .await?;
    print_cart(&lines, config.currency);
    Ok(())
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Returns an error if not signed in or the API request fails.
pub async fn remove(product_id: &str) -> Result<(), CommandError> {
    let (api, config) = context()?;
    let session = session()?;
    let lines = api
        .remove_from_cart(&session, &ProductId::new(product_id))
        .await?;
    print_cart(&lines, config.currency);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if not signed in or the API request fails.
pub async fn clear() -> Result<(), CommandError> {
    let (api, _) = context()?;
    let session = session()?;
    api.clear_cart(&session).await?;
    tracing::info!("Cart cleared.");
    Ok(())
}
