//! Wishlist management commands.
//!
//! All wishlist commands require `GLOWNEST_JWT`.

use glownest_core::{Price, ProductId};
use glownest_storefront::recommend::recommend;
use glownest_storefront::wishlist::{ToggleAction, WishlistMembership};

use super::{CommandError, context, session};

/// Show the wishlist, plus "you might also like" picks from the catalog.
///
/// # Errors
///
/// Returns an error if not signed in or an API request fails.
pub async fn show() -> Result<(), CommandError> {
    let (api, config) = context()?;
    let session = session()?;
    let products = api.wishlist(&session).await?;
    if products.is_empty() {
        tracing::info!("Wishlist is empty.");
        return Ok(());
    }
    for product in &products {
        tracing::info!(
            "{}  {}  {}",
            product.id,
            product.product_name,
            Price::new(product.price, config.currency).display()
        );
    }
    tracing::info!("{} product(s)", products.len());

    let catalog = api.catalog(&session).await?;
    let picks = recommend(&products, &catalog);
    if !picks.is_empty() {
        tracing::info!("You might also like:");
        for product in &picks {
            tracing::info!(
                "  {}  {}  {}",
                product.id,
                product.product_name,
                Price::new(product.price, config.currency).display()
            );
        }
    }
    Ok(())
}

/// Add or remove a product, depending on current membership.
///
/// # Errors
///
/// Returns an error if not signed in or an API request fails.
pub async fn toggle(product_id: &str) -> Result<(), CommandError> {
    let (api, _) = context()?;
    let session = session()?;
    let product_id = ProductId::new(product_id);

    let mut membership = WishlistMembership::new();
    membership.replace(&api.wishlist(&session).await?);

    match membership.toggle(&api, &session, &product_id).await? {
        Some(ToggleAction::Added) => tracing::info!("Added {product_id} to the wishlist."),
        Some(ToggleAction::Removed) => {
            tracing::info!("Removed {product_id} from the wishlist.");
        }
        None => tracing::info!("A toggle for {product_id} is already in flight."),
    }
    Ok(())
}

/// Clear the whole wishlist.
///
/// # Errors
///
/// Returns an error if not signed in or the API request fails.
pub async fn clear() -> Result<(), CommandError> {
    let (api, _) = context()?;
    let session = session()?;
    api.clear_wishlist(&session).await?;
    tracing::info!("Wishlist cleared.");
    Ok(())
}
