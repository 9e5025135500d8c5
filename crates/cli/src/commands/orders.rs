//! Order history commands.
//!
//! All order commands require `GLOWNEST_JWT`.

use glownest_core::{CurrencyCode, OrderId, Price};
use glownest_storefront::api::types::Order;

use super::{CommandError, context, session};

fn print_order(order: &Order, currency: CurrencyCode) {
    let created = order
        .created_at
        .map_or_else(|| "-".to_string(), |t| t.to_rfc3339());
    let total = order.total.map_or_else(
        || "-".to_string(),
        |t| Price::new(t, currency).display(),
    );
    tracing::info!("{}  {:?}  {}  {}", order.id, order.status, created, total);
}

/// List order history.
///
/// # Errors
///
/// Returns an error if not signed in or the API request fails.
pub async fn list() -> Result<(), CommandError> {
    let (api, config) = context()?;
    let session = session()?;
    let orders = api.orders(&session).await?;
    if orders.is_empty() {
        tracing::info!("No orders yet.");
        return Ok(());
    }
    for order in &orders {
        print_order(order, config.currency);
    }
    tracing::info!("{} order(s)", orders.len());
    Ok(())
}

/// Show a single order.
///
/// # Errors
///
/// Returns an error if not signed in, the order does not exist, or the API
/// request fails.
pub async fn show(order_id: &str) -> Result<(), CommandError> {
    let (api, config) = context()?;
    let session = session()?;
    let order = api.order(&session, &OrderId::new(order_id)).await?;
    print_order(&order, config.currency);
    Ok(())
}
