//! Payment sequencing.
//!
//! One attempt is: create a payment intent, confirm the card, record the
//! order, then clear the cart. Each stage is gated on the previous one and
//! nothing runs out of order. The same idempotency keys are reused for every
//! retry within a checkout session, so a network blip after the server
//! already charged the card cannot produce a second charge or a second
//! order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::instrument;
use uuid::Uuid;

use glownest_core::PaymentStatus;

use crate::api::types::{
    CheckoutPayload, IntentMetadata, IntentRequest, Order, OrderRequest, PaymentProof,
};
use crate::session::Session;

use super::{CardGateway, CartService, CheckoutError, GatewayError, IntentService, OrderService};

/// Payment provider name recorded on orders.
const PROVIDER: &str = "stripe";

// =============================================================================
// Idempotency keys
// =============================================================================

/// The pair of idempotency keys for one checkout session.
///
/// Minted once when checkout starts and reused verbatim across every retry,
/// including after a decline. The server deduplicates on them, so a repeated
/// request lands on the same intent and the same order. A fresh checkout
/// session gets fresh keys.
#[derive(Debug, Clone)]
pub struct IdempotencyKeys {
    key: String,
}

impl IdempotencyKeys {
    #[must_use]
    pub fn mint() -> Self {
        Self {
            key: Uuid::new_v4().to_string(),
        }
    }

    /// Key sent with the payment-intent request.
    #[must_use]
    pub fn intent_key(&self) -> &str {
        &self.key
    }

    /// Key sent with order creation, derived so the two endpoints never
    /// collide in the server's dedup store.
    #[must_use]
    pub fn order_key(&self) -> String {
        format!("{}-order", self.key)
    }
}

impl Default for IdempotencyKeys {
    fn default() -> Self {
        Self::mint()
    }
}

// =============================================================================
// Processor
// =============================================================================

/// Outcome of a payment attempt.
#[derive(Debug)]
pub enum PaymentOutcome {
    /// The order was recorded; the cart has been cleared (best effort).
    Placed(Order),
    /// Another attempt was already in flight; this one did nothing.
    Ignored,
}

/// Runs the payment sequence for one checkout session.
///
/// Holds the session's idempotency keys and an in-flight flag. The flag
/// rejects overlapping submissions (double clicks) outright rather than
/// queueing them; the keys make the retries that do run converge on a
/// single charge.
#[derive(Debug, Clone)]
pub struct PaymentProcessor {
    keys: IdempotencyKeys,
    in_flight: Arc<AtomicBool>,
}

impl PaymentProcessor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: IdempotencyKeys::mint(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The session's idempotency keys.
    #[must_use]
    pub fn keys(&self) -> &IdempotencyKeys {
        &self.keys
    }

    /// Run one payment attempt end to end.
    ///
    /// Stages, strictly in order:
    ///
    /// 1. create the payment intent (idempotent on the session key);
    /// 2. confirm the card against the returned client secret;
    /// 3. record the order with proof of payment (idempotent on the derived
    ///    order key);
    /// 4. clear the cart, best effort.
    ///
    /// A failure at any stage stops the sequence; later stages never run.
    /// If an attempt is already in flight the call returns
    /// [`PaymentOutcome::Ignored`] without touching any collaborator.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::Declined`] keeps checkout on the payment step for a
    /// retry with the same keys. [`CheckoutError::OrderCreationFailed`]
    /// means money moved but no order exists; it carries the intent id for
    /// reconciliation.
    #[instrument(skip_all, fields(items = payload.item_count()))]
    pub async fn pay<I, G, O, C>(
        &self,
        intents: &I,
        gateway: &G,
        orders: &O,
        cart: &C,
        session: &Session,
        payload: CheckoutPayload,
    ) -> Result<PaymentOutcome, CheckoutError>
    where
        I: IntentService,
        G: CardGateway,
        O: OrderService,
        C: CartService,
    {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("payment already in flight, ignoring submission");
            return Ok(PaymentOutcome::Ignored);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let request = IntentRequest {
            currency: payload.currency,
            metadata: IntentMetadata {
                item_count: payload.item_count().to_string(),
            },
            checkout: payload.clone(),
        };
        let intent = intents
            .create_intent(session, &request, self.keys.intent_key())
            .await?;
        let Some(client_secret) = intent.client_secret else {
            return Err(CheckoutError::Gateway(
                "Missing client secret from server.".to_string(),
            ));
        };

        let confirmation = match gateway.confirm_card_payment(&client_secret).await {
            Ok(confirmation) => confirmation,
            Err(GatewayError::Declined(message)) => {
                tracing::warn!(%message, "card declined");
                return Err(CheckoutError::Declined(message));
            }
            Err(GatewayError::Unavailable(message)) => {
                return Err(CheckoutError::Gateway(message));
            }
        };
        if !confirmation.status.is_succeeded() {
            tracing::warn!(status = %confirmation.status, "card confirmation did not succeed");
            return Err(CheckoutError::Declined(format!(
                "Payment {}",
                confirmation.status
            )));
        }

        let order_request = OrderRequest {
            checkout: payload,
            status: glownest_core::OrderStatus::Paid,
            payment_intent_id: confirmation.intent_id.clone(),
            payment: PaymentProof {
                provider: PROVIDER,
                status: PaymentStatus::Succeeded,
                intent_id: confirmation.intent_id.clone(),
            },
        };
        let order = match orders
            .create(session, &order_request, &self.keys.order_key())
            .await
        {
            Ok(order) => order,
            Err(err) => {
                tracing::error!(
                    intent_id = %confirmation.intent_id,
                    error = %err,
                    "order creation failed after successful payment"
                );
                return Err(CheckoutError::OrderCreationFailed {
                    intent_id: Some(confirmation.intent_id),
                    message: "Payment captured, but order creation failed.".to_string(),
                });
            }
        };

        // The order exists; a stale cart must not fail the attempt.
        if let Err(err) = cart.clear(session).await {
            tracing::warn!(error = %err, "failed to clear cart after order placement");
        }

        Ok(PaymentOutcome::Placed(order))
    }
}

impl Default for PaymentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Resets the in-flight flag when the attempt ends, on any path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use rust_decimal::Decimal;

    use glownest_core::{AddressId, CurrencyCode, IntentId, OrderId, OrderStatus};

    use crate::api::ApiError;
    use crate::api::types::{Address, CardConfirmation, CheckoutItem, PaymentIntent};

    fn payload() -> CheckoutPayload {
        let address = Address {
            id: AddressId::new("a1"),
            label: None,
            full_name: "Ada Glow".to_string(),
            phone: None,
            company: None,
            line1: "1 Dew Lane".to_string(),
            line2: None,
            city: "Sydney".to_string(),
            state: None,
            post_code: "2000".to_string(),
            country: "AU".to_string(),
            is_default: true,
        };
        CheckoutPayload {
            items: vec![CheckoutItem {
                product_id: glownest_core::ProductId::new("p1"),
                quantity: 2,
            }],
            shipping_address: address.clone(),
            billing_address: address,
            shipping: Decimal::new(999, 2),
            tax: Decimal::new(1000, 2),
            currency: CurrencyCode::AUD,
        }
    }

    fn order() -> Order {
        Order {
            id: OrderId::new("o1"),
            status: OrderStatus::Paid,
            created_at: None,
            total: None,
        }
    }

    #[derive(Default)]
    struct Intents {
        calls: AtomicUsize,
        keys: Mutex<Vec<String>>,
        missing_secret: bool,
        fail: bool,
        delay: Option<Duration>,
    }

    impl IntentService for Intents {
        async fn create_intent(
            &self,
            _session: &Session,
            _request: &IntentRequest,
            idempotency_key: &str,
        ) -> Result<PaymentIntent, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.keys
                .lock()
                .expect("lock")
                .push(idempotency_key.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ApiError::Api {
                    status: 502,
                    message: "upstream".to_string(),
                });
            }
            Ok(PaymentIntent {
                client_secret: (!self.missing_secret)
                    .then(|| "pi_123_secret_abc".to_string()),
                intent_id: Some(IntentId::new("pi_123")),
            })
        }
    }

    #[derive(Default)]
    struct Gateway {
        calls: AtomicUsize,
        decline: bool,
        status: Option<PaymentStatus>,
    }

    impl CardGateway for Gateway {
        async fn confirm_card_payment(
            &self,
            _client_secret: &str,
        ) -> Result<CardConfirmation, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.decline {
                return Err(GatewayError::Declined("Card was declined.".to_string()));
            }
            Ok(CardConfirmation {
                intent_id: IntentId::new("pi_123"),
                status: self.status.unwrap_or(PaymentStatus::Succeeded),
            })
        }
    }

    #[derive(Default)]
    struct Orders {
        calls: AtomicUsize,
        keys: Mutex<Vec<String>>,
        fail: bool,
    }

    impl OrderService for Orders {
        async fn create(
            &self,
            _session: &Session,
            _request: &OrderRequest,
            idempotency_key: &str,
        ) -> Result<Order, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.keys
                .lock()
                .expect("lock")
                .push(idempotency_key.to_string());
            if self.fail {
                return Err(ApiError::Api {
                    status: 500,
                    message: "db down".to_string(),
                });
            }
            Ok(order())
        }
    }

    #[derive(Default)]
    struct Cart {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CartService for Cart {
        async fn clear(&self, _session: &Session) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::Api {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    fn session() -> Session {
        Session::authenticated("jwt")
    }

    #[test]
    fn order_key_derives_from_the_session_key() {
        let keys = IdempotencyKeys::mint();
        assert_eq!(keys.order_key(), format!("{}-order", keys.intent_key()));
        assert_ne!(
            IdempotencyKeys::mint().intent_key(),
            keys.intent_key(),
            "fresh sessions mint fresh keys"
        );
    }

    #[tokio::test]
    async fn happy_path_runs_every_stage_once() {
        let (intents, gateway, orders, cart) =
            (Intents::default(), Gateway::default(), Orders::default(), Cart::default());
        let processor = PaymentProcessor::new();

        let outcome = processor
            .pay(&intents, &gateway, &orders, &cart, &session(), payload())
            .await
            .expect("payment");
        assert!(matches!(outcome, PaymentOutcome::Placed(o) if o.id.as_str() == "o1"));
        assert_eq!(intents.calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(orders.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cart.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            orders.keys.lock().expect("lock")[0],
            processor.keys().order_key()
        );
    }

    #[tokio::test]
    async fn intent_failure_stops_before_confirmation() {
        let intents = Intents {
            fail: true,
            ..Intents::default()
        };
        let (gateway, orders, cart) = (Gateway::default(), Orders::default(), Cart::default());
        let processor = PaymentProcessor::new();

        let err = processor
            .pay(&intents, &gateway, &orders, &cart, &session(), payload())
            .await
            .expect_err("must fail");
        assert!(matches!(err, CheckoutError::Api(_)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(orders.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_client_secret_is_a_gateway_error() {
        let intents = Intents {
            missing_secret: true,
            ..Intents::default()
        };
        let (gateway, orders, cart) = (Gateway::default(), Orders::default(), Cart::default());

        let err = PaymentProcessor::new()
            .pay(&intents, &gateway, &orders, &cart, &session(), payload())
            .await
            .expect_err("must fail");
        assert_eq!(err.to_string(), "Missing client secret from server.");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn decline_stops_before_order_and_keeps_the_keys() {
        let gateway = Gateway {
            decline: true,
            ..Gateway::default()
        };
        let (intents, orders, cart) = (Intents::default(), Orders::default(), Cart::default());
        let processor = PaymentProcessor::new();

        let err = processor
            .pay(&intents, &gateway, &orders, &cart, &session(), payload())
            .await
            .expect_err("declined");
        assert!(matches!(err, CheckoutError::Declined(_)));
        assert_eq!(orders.calls.load(Ordering::SeqCst), 0);
        assert_eq!(cart.calls.load(Ordering::SeqCst), 0);

        // Retrying after a decline reuses the same idempotency key.
        let gateway = Gateway::default();
        processor
            .pay(&intents, &gateway, &orders, &cart, &session(), payload())
            .await
            .expect("retry");
        let keys = intents.keys.lock().expect("lock");
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0], keys[1]);
    }

    #[tokio::test]
    async fn non_succeeded_confirmation_is_treated_as_a_decline() {
        let gateway = Gateway {
            status: Some(PaymentStatus::RequiresAction),
            ..Gateway::default()
        };
        let (intents, orders, cart) = (Intents::default(), Orders::default(), Cart::default());

        let err = PaymentProcessor::new()
            .pay(&intents, &gateway, &orders, &cart, &session(), payload())
            .await
            .expect_err("not succeeded");
        assert!(matches!(err, CheckoutError::Declined(_)));
        assert_eq!(err.to_string(), "Payment requires_action");
        assert_eq!(orders.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn order_failure_after_capture_carries_the_intent_id() {
        let orders = Orders {
            fail: true,
            ..Orders::default()
        };
        let (intents, gateway, cart) = (Intents::default(), Gateway::default(), Cart::default());

        let err = PaymentProcessor::new()
            .pay(&intents, &gateway, &orders, &cart, &session(), payload())
            .await
            .expect_err("order failed");
        match err {
            CheckoutError::OrderCreationFailed { intent_id, message } => {
                assert_eq!(intent_id.as_ref().map(IntentId::as_str), Some("pi_123"));
                assert_eq!(message, "Payment captured, but order creation failed.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(cart.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cart_clear_failure_does_not_fail_the_attempt() {
        let cart = Cart {
            fail: true,
            ..Cart::default()
        };
        let (intents, gateway, orders) =
            (Intents::default(), Gateway::default(), Orders::default());

        let outcome = PaymentProcessor::new()
            .pay(&intents, &gateway, &orders, &cart, &session(), payload())
            .await
            .expect("order placed");
        assert!(matches!(outcome, PaymentOutcome::Placed(_)));
        assert_eq!(cart.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_submission_is_ignored() {
        let intents = Intents {
            delay: Some(Duration::from_millis(50)),
            ..Intents::default()
        };
        let (gateway, orders, cart) = (Gateway::default(), Orders::default(), Cart::default());
        let processor = PaymentProcessor::new();
        let session = session();

        let (first, second) = tokio::join!(
            processor.pay(&intents, &gateway, &orders, &cart, &session, payload()),
            processor.pay(&intents, &gateway, &orders, &cart, &session, payload()),
        );
        let outcomes = [first.expect("first"), second.expect("second")];
        assert!(
            outcomes
                .iter()
                .any(|o| matches!(o, PaymentOutcome::Placed(_)))
        );
        assert!(outcomes.iter().any(|o| matches!(o, PaymentOutcome::Ignored)));
        assert_eq!(intents.calls.load(Ordering::SeqCst), 1);
        assert_eq!(orders.calls.load(Ordering::SeqCst), 1);
    }
}
