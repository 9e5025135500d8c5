//! Checkout orchestration.
//!
//! A linear three-step wizard: cart review, shipping selection, payment
//! collection. The cart itself is owned by the backend and re-read live, so
//! moving between steps never loses data. Payment sequencing lives in
//! [`payment`]: one payment-intent request, one card confirmation, one order
//! creation, in that order, each gated on the previous step succeeding.
//!
//! Collaborators (the backend API, the hosted card element) are traits so
//! the orchestrator is testable without a network.

pub mod payment;
pub mod totals;

pub use payment::{IdempotencyKeys, PaymentOutcome, PaymentProcessor};
pub use totals::{SHIPPING_FEE, TAX_RATE, Totals};

use thiserror::Error;
use tracing::instrument;

use glownest_core::{AddressId, CurrencyCode, IntentId};

use crate::api::ApiError;
use crate::api::types::{
    Address, CardConfirmation, CartLine, CheckoutItem, CheckoutPayload, IntentRequest, Order,
    OrderRequest, PaymentIntent,
};
use crate::session::Session;

// =============================================================================
// Collaborator traits
// =============================================================================

/// Backend endpoint that mints payment intents.
pub trait IntentService {
    fn create_intent(
        &self,
        session: &Session,
        request: &IntentRequest,
        idempotency_key: &str,
    ) -> impl Future<Output = Result<PaymentIntent, ApiError>>;
}

/// The hosted card element: confirms a charge for a client secret.
pub trait CardGateway {
    fn confirm_card_payment(
        &self,
        client_secret: &str,
    ) -> impl Future<Output = Result<CardConfirmation, GatewayError>>;
}

/// Backend endpoint that records orders.
pub trait OrderService {
    fn create(
        &self,
        session: &Session,
        request: &OrderRequest,
        idempotency_key: &str,
    ) -> impl Future<Output = Result<Order, ApiError>>;
}

/// The cart store, as far as checkout is concerned: it only ever clears it.
pub trait CartService {
    fn clear(&self, session: &Session) -> impl Future<Output = Result<(), ApiError>>;
}

/// The address service: checkout only reads the list.
pub trait AddressDirectory {
    fn list(&self, session: &Session) -> impl Future<Output = Result<Vec<Address>, ApiError>>;
}

// =============================================================================
// Errors
// =============================================================================

/// Failure from the hosted card element.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The card was declined; the message is the gateway's own.
    #[error("{0}")]
    Declined(String),
    /// The gateway could not be reached or answered with garbage.
    #[error("{0}")]
    Unavailable(String),
}

/// Errors surfaced by the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Input is incomplete; nothing was sent to any collaborator.
    #[error("{0}")]
    Validation(String),

    /// A collaborator rejected the session; the local token has been
    /// cleared and the user must sign in again.
    #[error("Session expired. Please sign in again.")]
    AuthRequired,

    /// A backend call failed; the attempt can be retried as-is.
    #[error(transparent)]
    Api(ApiError),

    /// The gateway declined the card; checkout stays on the payment step
    /// and the session's idempotency keys are reused on retry.
    #[error("{0}")]
    Declined(String),

    /// The gateway or the intent response was unusable.
    #[error("{0}")]
    Gateway(String),

    /// Payment was captured but the order was not recorded. Higher severity
    /// than any other failure: the user must see it and support must be able
    /// to reconcile by intent id. Never silently retried.
    #[error("Payment captured, but order creation failed: {message}")]
    OrderCreationFailed {
        intent_id: Option<IntentId>,
        message: String,
    },
}

impl From<ApiError> for CheckoutError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => Self::AuthRequired,
            other => Self::Api(other),
        }
    }
}

// =============================================================================
// Steps
// =============================================================================

/// The three checkout steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    CartReview,
    ShippingSelection,
    PaymentCollection,
}

impl CheckoutStep {
    const fn next(self) -> Self {
        match self {
            Self::CartReview => Self::ShippingSelection,
            Self::ShippingSelection | Self::PaymentCollection => Self::PaymentCollection,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::CartReview | Self::ShippingSelection => Self::CartReview,
            Self::PaymentCollection => Self::ShippingSelection,
        }
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// State for one checkout session.
///
/// Owns nothing authoritative: the cart lives in the backend and is re-read
/// live, addresses are fetched on entering shipping selection, and the
/// payload handed to payment is rebuilt per attempt.
#[derive(Debug)]
pub struct Checkout {
    step: CheckoutStep,
    currency: CurrencyCode,
    addresses: Vec<Address>,
    selected_address: Option<AddressId>,
    /// Last validation message for the shipping step, if any.
    shipping_error: Option<String>,
}

impl Checkout {
    /// Start a checkout at cart review.
    #[must_use]
    pub const fn new(currency: CurrencyCode) -> Self {
        Self {
            step: CheckoutStep::CartReview,
            currency,
            addresses: Vec::new(),
            selected_address: None,
            shipping_error: None,
        }
    }

    /// The currently active step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Advance one step. Steps are never skipped.
    pub fn advance(&mut self) {
        self.step = self.step.next();
    }

    /// Go back one step. The cart is owned externally, so nothing is lost.
    pub fn back(&mut self) {
        self.step = self.step.previous();
    }

    /// Addresses fetched for the shipping step.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// The currently selected shipping address, if any.
    #[must_use]
    pub fn selected_address(&self) -> Option<&Address> {
        let selected = self.selected_address.as_ref()?;
        self.addresses.iter().find(|a| &a.id == selected)
    }

    /// Pending validation message for the shipping step.
    #[must_use]
    pub fn shipping_error(&self) -> Option<&str> {
        self.shipping_error.as_deref()
    }

    /// Select a shipping address by id.
    pub fn select_address(&mut self, address_id: AddressId) {
        self.shipping_error = None;
        self.selected_address = Some(address_id);
    }

    /// Fetch saved addresses on entering shipping selection.
    ///
    /// When the list is non-empty and nothing has been chosen yet, the
    /// default-flagged address is selected, else the first in returned
    /// order. An empty list leaves no selection, which blocks payment until
    /// the user creates an address.
    ///
    /// # Errors
    ///
    /// On an authentication failure the session is cleared and the whole
    /// flow aborts with [`CheckoutError::AuthRequired`]; other API errors
    /// are retryable.
    #[instrument(skip_all)]
    pub async fn load_addresses<A: AddressDirectory>(
        &mut self,
        directory: &A,
        session: &mut Session,
    ) -> Result<(), CheckoutError> {
        self.shipping_error = None;
        let addresses = match directory.list(session).await {
            Ok(addresses) => addresses,
            Err(ApiError::Unauthorized) => {
                session.clear();
                return Err(CheckoutError::AuthRequired);
            }
            Err(err) => return Err(CheckoutError::Api(err)),
        };

        if self.selected_address.is_none()
            && let Some(default) = addresses
                .iter()
                .find(|a| a.is_default)
                .or_else(|| addresses.first())
        {
            self.selected_address = Some(default.id.clone());
        }
        self.addresses = addresses;
        Ok(())
    }

    /// Build the payload for one payment attempt from the live cart.
    ///
    /// Ephemeral by design: rebuilt fresh per attempt, never persisted.
    ///
    /// # Errors
    ///
    /// With no selected address the orchestrator falls back to shipping
    /// selection and returns a validation error; payment is never attempted.
    /// An empty cart is likewise rejected before any network call.
    pub fn build_payload(&mut self, lines: &[CartLine]) -> Result<CheckoutPayload, CheckoutError> {
        let Some(address) = self.selected_address().cloned() else {
            let message = "Please choose a shipping address.".to_string();
            self.step = CheckoutStep::ShippingSelection;
            self.shipping_error = Some(message.clone());
            return Err(CheckoutError::Validation(message));
        };

        if lines.is_empty() {
            return Err(CheckoutError::Validation(
                "Your cart is empty.".to_string(),
            ));
        }

        let totals = Totals::from_lines(lines);
        Ok(CheckoutPayload {
            items: lines
                .iter()
                .map(|line| CheckoutItem {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            shipping_address: address.clone(),
            billing_address: address,
            shipping: totals.shipping,
            tax: totals.tax,
            currency: self.currency,
        })
    }
}
