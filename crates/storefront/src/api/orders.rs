//! Order methods.

use reqwest::Method;
use tracing::instrument;

use glownest_core::OrderId;

use crate::checkout::OrderService;
use crate::session::Session;

use super::payments::IDEMPOTENCY_KEY_HEADER;
use super::types::{Order, OrderRequest};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Create an order after a captured payment.
    ///
    /// The idempotency key is distinct from the intent key (same session key
    /// with an `-order` suffix) so a page retry after a network failure does
    /// not duplicate the order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session, request), fields(idempotency_key))]
    pub async fn create_order(
        &self,
        session: &Session,
        request: &OrderRequest,
        idempotency_key: &str,
    ) -> Result<Order, ApiError> {
        let builder = self
            .request(Method::POST, "/orders", session)
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key)
            .json(request);
        self.send(builder).await
    }

    /// List the user's order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn orders(&self, session: &Session) -> Result<Vec<Order>, ApiError> {
        self.send(self.request(Method::GET, "/orders", session))
            .await
    }

    /// Fetch a single order, e.g. for the confirmation view.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the API request fails.
    #[instrument(skip(self, session), fields(order_id = %order_id))]
    pub async fn order(&self, session: &Session, order_id: &OrderId) -> Result<Order, ApiError> {
        self.send(self.request(Method::GET, &format!("/orders/{order_id}"), session))
            .await
    }
}

impl OrderService for ApiClient {
    async fn create(
        &self,
        session: &Session,
        request: &OrderRequest,
        idempotency_key: &str,
    ) -> Result<Order, ApiError> {
        self.create_order(session, request, idempotency_key).await
    }
}
