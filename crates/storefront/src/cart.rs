//! Client-side cart state.
//!
//! The backend owns the cart; [`CartStore`] keeps the last server snapshot
//! so totals and badges render without a round trip. Every mutation replaces
//! the whole snapshot with the server's response rather than patching it
//! locally, so the cache can never drift from the backend.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use glownest_core::ProductId;

use crate::api::types::CartLine;
use crate::api::{ApiClient, ApiError};
use crate::checkout::Totals;
use crate::session::Session;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Rejected before any network call.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The last known server snapshot of the cart.
#[derive(Debug, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl CartStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The cached cart lines.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Total unit count, for the header badge.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of line price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        Totals::from_lines(&self.lines).subtotal
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Re-read the cart from the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; the cached snapshot is
    /// left untouched.
    #[instrument(skip_all)]
    pub async fn refresh(
        &mut self,
        api: &ApiClient,
        session: &Session,
    ) -> Result<(), CartError> {
        self.lines = api.cart(session).await?;
        Ok(())
    }

    /// Add a product, replacing the snapshot with the server's cart.
    ///
    /// # Errors
    ///
    /// Rejects a zero quantity before calling the backend; otherwise fails
    /// only when the API request does.
    #[instrument(skip(self, api, session), fields(product_id = %product_id))]
    pub async fn add(
        &mut self,
        api: &ApiClient,
        session: &Session,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        Self::validate_quantity(quantity)?;
        self.lines = api.add_to_cart(session, product_id, quantity).await?;
        Ok(())
    }

    /// Set a line's quantity.
    ///
    /// # Errors
    ///
    /// Rejects a zero quantity (use [`CartStore::remove`] to drop a line);
    /// otherwise fails only when the API request does.
    #[instrument(skip(self, api, session), fields(product_id = %product_id, quantity))]
    pub async fn set_quantity(
        &mut self,
        api: &ApiClient,
        session: &Session,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        Self::validate_quantity(quantity)?;
        self.lines = api.set_cart_quantity(session, product_id, quantity).await?;
        Ok(())
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, api, session), fields(product_id = %product_id))]
    pub async fn remove(
        &mut self,
        api: &ApiClient,
        session: &Session,
        product_id: &ProductId,
    ) -> Result<(), CartError> {
        self.lines = api.remove_from_cart(session, product_id).await?;
        Ok(())
    }

    /// Empty the cart on the server and locally.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn clear(
        &mut self,
        api: &ApiClient,
        session: &Session,
    ) -> Result<(), CartError> {
        api.clear_cart(session).await?;
        self.lines.clear();
        Ok(())
    }

    /// Drop the local snapshot without touching the server, for sign-out.
    pub fn reset(&mut self) {
        self.lines.clear();
    }

    fn validate_quantity(quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::Validation(
                "Quantity must be at least 1.".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, price: Decimal, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            product_name: "Cleanser".to_string(),
            price,
            image_url: None,
            quantity,
        }
    }

    #[test]
    fn totals_come_from_the_snapshot() {
        let store = CartStore {
            lines: vec![
                line("p1", Decimal::new(2450, 2), 2),
                line("p2", Decimal::new(1800, 2), 1),
            ],
        };
        assert_eq!(store.total_quantity(), 3);
        assert_eq!(store.subtotal(), Decimal::new(6700, 2));
        assert!(!store.is_empty());
    }

    #[test]
    fn empty_store_has_zero_totals() {
        let store = CartStore::new();
        assert!(store.is_empty());
        assert_eq!(store.total_quantity(), 0);
        assert_eq!(store.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn zero_quantity_is_rejected_locally() {
        let err = CartStore::validate_quantity(0).expect_err("zero quantity");
        assert!(matches!(err, CartError::Validation(_)));
        assert!(CartStore::validate_quantity(1).is_ok());
    }

    #[test]
    fn reset_drops_the_snapshot() {
        let mut store = CartStore {
            lines: vec![line("p1", Decimal::ONE, 1)],
        };
        store.reset();
        assert!(store.is_empty());
    }
}
