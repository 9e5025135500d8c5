//! Wishlist resource methods (not cached - mutable state).

use reqwest::Method;
use tracing::instrument;

use glownest_core::ProductId;

use crate::session::Session;

use super::types::Product;
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Get the wishlist as full product objects.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn wishlist(&self, session: &Session) -> Result<Vec<Product>, ApiError> {
        self.send(self.request(Method::GET, "/wishlist", session))
            .await
    }

    /// Add a product to the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session), fields(product_id = %product_id))]
    pub async fn add_to_wishlist(
        &self,
        session: &Session,
        product_id: &ProductId,
    ) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, &format!("/wishlist/{product_id}"), session);
        self.send_no_body(builder).await
    }

    /// Remove a product from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session), fields(product_id = %product_id))]
    pub async fn remove_from_wishlist(
        &self,
        session: &Session,
        product_id: &ProductId,
    ) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("/wishlist/{product_id}"), session);
        self.send_no_body(builder).await
    }

    /// Clear the whole wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn clear_wishlist(&self, session: &Session) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, "/wishlist", session);
        self.send_no_body(builder).await
    }
}
