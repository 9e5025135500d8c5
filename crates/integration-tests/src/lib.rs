//! Integration tests for GlowNest.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p glownest-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - End-to-end payment sequencing against scripted
//!   collaborators
//! - `recommendations` - Wishlist scoring properties over catalog fixtures
//!
//! This crate exercises the storefront against scripted in-process
//! collaborators rather than a live backend: the payment traits are small
//! enough that every failure mode (declines, missing client secrets, order
//! creation failures) can be scripted deterministically.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rust_decimal::Decimal;

use glownest_core::{AddressId, CurrencyCode, IntentId, OrderId, OrderStatus, PaymentStatus, ProductId};
use glownest_storefront::api::ApiError;
use glownest_storefront::api::types::{
    Address, CardConfirmation, CartLine, CheckoutItem, CheckoutPayload, IntentRequest, Order,
    OrderRequest, PaymentIntent, Product,
};
use glownest_storefront::checkout::{
    AddressDirectory, CardGateway, CartService, GatewayError, IntentService, OrderService,
};
use glownest_storefront::session::Session;

// =============================================================================
// Fixtures
// =============================================================================

/// A catalog product fixture.
#[must_use]
pub fn product(id: &str, brand: Option<&str>, name: &str, price: &str, available: bool) -> Product {
    Product {
        id: ProductId::new(id),
        product_name: name.to_string(),
        brand: brand.map(ToString::to_string),
        price: price.parse().unwrap_or(Decimal::ZERO),
        is_available: available,
        image_url: None,
    }
}

/// A saved address fixture.
#[must_use]
pub fn address(id: &str, is_default: bool) -> Address {
    Address {
        id: AddressId::new(id),
        label: Some("Home".to_string()),
        full_name: "Ada Glow".to_string(),
        phone: None,
        company: None,
        line1: "1 Dew Lane".to_string(),
        line2: None,
        city: "Sydney".to_string(),
        state: Some("NSW".to_string()),
        post_code: "2000".to_string(),
        country: "AU".to_string(),
        is_default,
    }
}

/// A cart line fixture.
#[must_use]
pub fn cart_line(id: &str, price: &str, quantity: u32) -> CartLine {
    CartLine {
        product_id: ProductId::new(id),
        product_name: "Hydrating Serum".to_string(),
        price: price.parse().unwrap_or(Decimal::ZERO),
        image_url: None,
        quantity,
    }
}

/// A checkout payload over the given lines, shipped to the default address.
#[must_use]
pub fn payload(lines: &[CartLine]) -> CheckoutPayload {
    let addr = address("a1", true);
    CheckoutPayload {
        items: lines
            .iter()
            .map(|line| CheckoutItem {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
            })
            .collect(),
        shipping_address: addr.clone(),
        billing_address: addr,
        shipping: Decimal::new(999, 2),
        tax: Decimal::new(1000, 2),
        currency: CurrencyCode::AUD,
    }
}

/// An authenticated session fixture.
#[must_use]
pub fn session() -> Session {
    Session::authenticated("test-jwt")
}

fn api_error(status: u16, message: &str) -> ApiError {
    ApiError::Api {
        status,
        message: message.to_string(),
    }
}

// =============================================================================
// Scripted collaborators
// =============================================================================

/// Scripted payment-intent endpoint.
#[derive(Default)]
pub struct ScriptedIntents {
    pub calls: AtomicUsize,
    pub keys: Mutex<Vec<String>>,
    /// Respond without a client secret.
    pub missing_secret: bool,
    /// Fail the request outright.
    pub fail: bool,
    /// Sleep before responding, to widen the double-submit window.
    pub delay: Option<Duration>,
}

impl ScriptedIntents {
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every idempotency key seen so far.
    ///
    /// # Panics
    ///
    /// Panics if the key log mutex is poisoned.
    #[must_use]
    pub fn seen_keys(&self) -> Vec<String> {
        self.keys.lock().expect("key log poisoned").clone()
    }
}

impl IntentService for ScriptedIntents {
    async fn create_intent(
        &self,
        _session: &Session,
        _request: &IntentRequest,
        idempotency_key: &str,
    ) -> Result<PaymentIntent, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.keys
            .lock()
            .expect("key log poisoned")
            .push(idempotency_key.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(api_error(502, "payment service unavailable"));
        }
        Ok(PaymentIntent {
            client_secret: (!self.missing_secret).then(|| "pi_test_secret_123".to_string()),
            intent_id: Some(IntentId::new("pi_test")),
        })
    }
}

/// Scripted card gateway.
#[derive(Default)]
pub struct ScriptedGateway {
    pub calls: AtomicUsize,
    /// Decline the card with this message.
    pub decline: Option<String>,
    /// Report this status instead of `succeeded`.
    pub status: Option<PaymentStatus>,
}

impl ScriptedGateway {
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CardGateway for ScriptedGateway {
    async fn confirm_card_payment(
        &self,
        _client_secret: &str,
    ) -> Result<CardConfirmation, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.decline {
            return Err(GatewayError::Declined(message.clone()));
        }
        Ok(CardConfirmation {
            intent_id: IntentId::new("pi_test"),
            status: self.status.unwrap_or(PaymentStatus::Succeeded),
        })
    }
}

/// Scripted order endpoint.
#[derive(Default)]
pub struct ScriptedOrders {
    pub calls: AtomicUsize,
    pub keys: Mutex<Vec<String>>,
    pub fail: bool,
}

impl ScriptedOrders {
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every idempotency key seen so far.
    ///
    /// # Panics
    ///
    /// Panics if the key log mutex is poisoned.
    #[must_use]
    pub fn seen_keys(&self) -> Vec<String> {
        self.keys.lock().expect("key log poisoned").clone()
    }
}

impl OrderService for ScriptedOrders {
    async fn create(
        &self,
        _session: &Session,
        _request: &OrderRequest,
        idempotency_key: &str,
    ) -> Result<Order, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.keys
            .lock()
            .expect("key log poisoned")
            .push(idempotency_key.to_string());
        if self.fail {
            return Err(api_error(500, "order store unavailable"));
        }
        Ok(Order {
            id: OrderId::new("order-1"),
            status: OrderStatus::Paid,
            created_at: None,
            total: None,
        })
    }
}

/// Scripted cart endpoint; checkout only clears it.
#[derive(Default)]
pub struct ScriptedCart {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl ScriptedCart {
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CartService for ScriptedCart {
    async fn clear(&self, _session: &Session) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(api_error(500, "cart store unavailable"));
        }
        Ok(())
    }
}

/// Scripted address book.
#[derive(Default)]
pub struct ScriptedAddresses {
    pub addresses: Vec<Address>,
    pub unauthorized: bool,
}

impl AddressDirectory for ScriptedAddresses {
    async fn list(&self, _session: &Session) -> Result<Vec<Address>, ApiError> {
        if self.unauthorized {
            return Err(ApiError::Unauthorized);
        }
        Ok(self.addresses.clone())
    }
}
