//! Cart resource methods (not cached - mutable state).
//!
//! The backend owns the cart; every mutation returns the full cart, which is
//! normalized into [`CartLine`]s for the rest of the crate.

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use glownest_core::ProductId;

use crate::checkout::CartService;
use crate::session::Session;

use super::types::{CartEntry, CartLine};
use super::{ApiClient, ApiError};

fn normalize(entries: Vec<CartEntry>) -> Vec<CartLine> {
    entries.into_iter().map(CartLine::from).collect()
}

impl ApiClient {
    /// Get the user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn cart(&self, session: &Session) -> Result<Vec<CartLine>, ApiError> {
        let entries: Vec<CartEntry> = self
            .send(self.request(Method::GET, "/me/cart", session))
            .await?;
        Ok(normalize(entries))
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        session: &Session,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, ApiError> {
        let builder = self
            .request(Method::POST, "/me/cart/items", session)
            .json(&json!({ "productId": product_id, "quantity": quantity }));
        let entries: Vec<CartEntry> = self.send(builder).await?;
        Ok(normalize(entries))
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session), fields(product_id = %product_id, quantity))]
    pub async fn set_cart_quantity(
        &self,
        session: &Session,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, ApiError> {
        let builder = self
            .request(
                Method::PATCH,
                &format!("/me/cart/items/{product_id}"),
                session,
            )
            .json(&json!({ "quantity": quantity }));
        let entries: Vec<CartEntry> = self.send(builder).await?;
        Ok(normalize(entries))
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session), fields(product_id = %product_id))]
    pub async fn remove_from_cart(
        &self,
        session: &Session,
        product_id: &ProductId,
    ) -> Result<Vec<CartLine>, ApiError> {
        let builder = self.request(
            Method::DELETE,
            &format!("/me/cart/items/{product_id}"),
            session,
        );
        let entries: Vec<CartEntry> = self.send(builder).await?;
        Ok(normalize(entries))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn clear_cart(&self, session: &Session) -> Result<(), ApiError> {
        let builder = self
            .request(Method::PUT, "/me/cart", session)
            .json(&json!([]));
        self.send_no_body(builder).await
    }
}

impl CartService for ApiClient {
    async fn clear(&self, session: &Session) -> Result<(), ApiError> {
        self.clear_cart(session).await
    }
}
