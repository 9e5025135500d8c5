//! Payment-intent methods.

use reqwest::Method;
use tracing::instrument;

use crate::checkout::IntentService;
use crate::session::Session;

use super::types::{IntentRequest, PaymentIntent};
use super::{ApiClient, ApiError};

/// Header carrying the per-session idempotency key so a retried request does
/// not create a duplicate intent.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

impl ApiClient {
    /// Request a payment intent for a checkout attempt.
    ///
    /// The server computes the charge amount from the checkout details; the
    /// client never sends a trusted total.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session, request), fields(idempotency_key))]
    pub async fn create_payment_intent(
        &self,
        session: &Session,
        request: &IntentRequest,
        idempotency_key: &str,
    ) -> Result<PaymentIntent, ApiError> {
        let builder = self
            .request(Method::POST, "/payments/create-intent", session)
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key)
            .json(request);
        self.send(builder).await
    }
}

impl IntentService for ApiClient {
    async fn create_intent(
        &self,
        session: &Session,
        request: &IntentRequest,
        idempotency_key: &str,
    ) -> Result<PaymentIntent, ApiError> {
        self.create_payment_intent(session, request, idempotency_key)
            .await
    }
}
