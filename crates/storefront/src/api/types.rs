//! Wire schemas for the GlowNest backend.
//!
//! Every endpoint's request and response shape is declared here explicitly.
//! The backend speaks camelCase JSON with Mongo-style `_id` identifiers and
//! prices as JSON numbers; a response that does not match its schema fails
//! decoding instead of defaulting fields.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use glownest_core::{AddressId, CurrencyCode, IntentId, OrderId, OrderStatus, PaymentStatus, ProductId};

// =============================================================================
// Products
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Catalog filter parameters, mirroring the backend's `/products` query
/// string. Multi-value filters are sent comma-joined.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub category: Vec<String>,
    pub brands: Vec<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub gender: Vec<String>,
    pub skin: Vec<String>,
    pub tags: Vec<String>,
}

impl ProductQuery {
    /// Whether no filter is set (the plain catalog listing).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.q.is_none()
            && self.category.is_empty()
            && self.brands.is_empty()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.gender.is_empty()
            && self.skin.is_empty()
            && self.tags.is_empty()
    }

    /// Render the filter as query-string pairs.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = &self.q {
            pairs.push(("q", q.clone()));
        }
        if !self.category.is_empty() {
            pairs.push(("category", self.category.join(",")));
        }
        if !self.brands.is_empty() {
            pairs.push(("brands", self.brands.join(",")));
        }
        if let Some(min) = self.min_price {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("maxPrice", max.to_string()));
        }
        if !self.gender.is_empty() {
            pairs.push(("gender", self.gender.join(",")));
        }
        if !self.skin.is_empty() {
            pairs.push(("skin", self.skin.join(",")));
        }
        if !self.tags.is_empty() {
            pairs.push(("tags", self.tags.join(",")));
        }
        pairs
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A raw cart entry as returned by the backend: the product reference is
/// populated into the full product object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub product_id: Product,
    pub quantity: u32,
}

/// A normalized cart line, the shape the rest of the crate works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub quantity: u32,
}

impl From<CartEntry> for CartLine {
    fn from(entry: CartEntry) -> Self {
        Self {
            product_id: entry.product_id.id,
            product_name: entry.product_id.product_name,
            price: entry.product_id.price,
            image_url: entry.product_id.image_url,
            quantity: entry.quantity,
        }
    }
}

// =============================================================================
// Addresses
// =============================================================================

/// A saved shipping address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "_id", alias = "id")]
    pub id: AddressId,
    #[serde(default)]
    pub label: Option<String>,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(alias = "postalCode")]
    pub post_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Fields for creating or updating an address.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub post_code: String,
    pub country: String,
    pub is_default: bool,
}

// =============================================================================
// Checkout & Payments
// =============================================================================

/// One line of a checkout payload: the product and how many.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// The full checkout payload sent to the payment-intent and order endpoints.
///
/// Built fresh for every payment attempt and never persisted. The server is
/// the source of truth for the charged amount - the client sends the raw
/// inputs (items, address, fees) and never a trusted total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    pub items: Vec<CheckoutItem>,
    pub shipping_address: Address,
    /// Same object as the shipping address - there is no distinct billing flow.
    pub billing_address: Address,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    pub currency: CurrencyCode,
}

impl CheckoutPayload {
    /// Total unit count across all lines, used for intent metadata.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Request body for `POST /payments/create-intent`.
#[derive(Debug, Clone, Serialize)]
pub struct IntentRequest {
    pub currency: CurrencyCode,
    pub metadata: IntentMetadata,
    /// Full checkout details so the server can compute the exact amount.
    pub checkout: CheckoutPayload,
}

/// Intent metadata; the gateway requires string values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentMetadata {
    pub item_count: String,
}

/// Response from `POST /payments/create-intent`.
///
/// Both fields are optional on the wire; a missing client secret is a
/// checkout-level failure, not a decode error, so the caller can surface a
/// precise message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub intent_id: Option<IntentId>,
}

/// Result of confirming a card payment with the hosted gateway.
#[derive(Debug, Clone)]
pub struct CardConfirmation {
    pub intent_id: IntentId,
    pub status: PaymentStatus,
}

/// Proof of payment attached to order creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProof {
    pub provider: &'static str,
    pub status: PaymentStatus,
    pub intent_id: IntentId,
}

// =============================================================================
// Orders
// =============================================================================

/// Request body for `POST /orders`: the checkout payload marked paid, plus
/// proof of payment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(flatten)]
    pub checkout: CheckoutPayload,
    pub status: OrderStatus,
    pub payment_intent_id: IntentId,
    pub payment: PaymentProof,
}

/// An order record as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total: Option<Decimal>,
}

// =============================================================================
// Account
// =============================================================================

/// Response from `POST /login` and `POST /register`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTokens {
    pub jwt: String,
}

/// Request body for `POST /register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

/// The signed-in user's profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub newsletter: bool,
}

/// Fields for `PUT /me`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub newsletter: bool,
    /// Only sent when the user is changing their password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
