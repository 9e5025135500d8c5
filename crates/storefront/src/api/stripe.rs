//! Hosted card gateway client.
//!
//! Stands in for the browser-embedded card element: given a client secret
//! from the backend, it confirms the payment intent directly against the
//! gateway's client-facing API using the publishable key and a test payment
//! method. The gateway's internals are out of scope; the rest of the crate
//! only sees the [`CardGateway`] trait.
//!
//! This flow is a simulation - never pass real card data through it.

use reqwest::Method;
use serde::Deserialize;
use tracing::{instrument, warn};

use glownest_core::{IntentId, PaymentStatus};

use crate::checkout::{CardGateway, GatewayError};
use crate::config::{ConfigError, StorefrontConfig};

use super::types::CardConfirmation;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Stripe's shareable test payment method (4242 4242 4242 4242).
const TEST_PAYMENT_METHOD: &str = "pm_card_visa";

/// Card-confirmation client for the hosted gateway.
#[derive(Clone)]
pub struct StripeCardGateway {
    http: reqwest::Client,
    publishable_key: String,
}

/// Successful confirmation response.
#[derive(Debug, Deserialize)]
struct StripeIntent {
    id: IntentId,
    status: PaymentStatus,
}

/// Error envelope returned by the gateway.
#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "type", default)]
    error_type: Option<String>,
}

impl StripeCardGateway {
    /// Create a gateway client from the publishable key.
    #[must_use]
    pub fn new(publishable_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            publishable_key: publishable_key.into(),
        }
    }

    /// Create a gateway client from the storefront configuration.
    ///
    /// # Errors
    ///
    /// Fails when no publishable key is configured, so checkout aborts
    /// before any payment attempt rather than at confirmation time.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ConfigError> {
        let key = config.stripe_publishable_key.as_deref().ok_or_else(|| {
            ConfigError::MissingEnvVar("GLOWNEST_STRIPE_PUBLISHABLE_KEY".to_string())
        })?;
        Ok(Self::new(key))
    }
}

impl CardGateway for StripeCardGateway {
    /// Confirm the card payment for a client secret.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Declined`] when the gateway rejects the card
    /// and [`GatewayError::Unavailable`] for transport or protocol failures.
    #[instrument(skip_all)]
    async fn confirm_card_payment(
        &self,
        client_secret: &str,
    ) -> Result<CardConfirmation, GatewayError> {
        let intent_id = intent_id_from_secret(client_secret).ok_or_else(|| {
            GatewayError::Unavailable("Card element not ready.".to_string())
        })?;

        let url = format!("{STRIPE_API_BASE}/payment_intents/{intent_id}/confirm");
        let response = self
            .http
            .request(Method::POST, url)
            .form(&[
                ("key", self.publishable_key.as_str()),
                ("client_secret", client_secret),
                ("payment_method", TEST_PAYMENT_METHOD),
            ])
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            let decline = serde_json::from_str::<StripeErrorBody>(&body)
                .ok()
                .map(|b| b.error);
            if let Some(kind) = decline.as_ref().and_then(|e| e.error_type.as_deref()) {
                warn!(kind, "gateway rejected the card");
            }
            let message = decline
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Card was declined.".to_string());
            return Err(GatewayError::Declined(message));
        }

        let intent: StripeIntent = serde_json::from_str(&body)
            .map_err(|e| GatewayError::Unavailable(format!("unexpected gateway response: {e}")))?;

        Ok(CardConfirmation {
            intent_id: intent.id,
            status: intent.status,
        })
    }
}

/// The intent id is the prefix of the client secret (`pi_..._secret_...`).
fn intent_id_from_secret(client_secret: &str) -> Option<IntentId> {
    let (intent_id, _) = client_secret.split_once("_secret")?;
    if intent_id.is_empty() {
        return None;
    }
    Some(IntentId::new(intent_id))
}
