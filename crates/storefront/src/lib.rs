//! GlowNest Storefront - headless client for the GlowNest backend.
//!
//! This crate provides everything the storefront UI layer needs short of
//! rendering: typed REST clients for the backend, a pure product
//! recommendation engine, and a checkout orchestrator that sequences the
//! payment-intent / card-confirmation / order-creation flow with idempotency
//! keys.
//!
//! # Architecture
//!
//! - The backend is the source of truth for cart contents, addresses, and
//!   orders. Client-side copies are caches invalidated by re-fetch after
//!   each mutation.
//! - Authentication is an explicit [`session::Session`] passed into every
//!   call - there is no ambient token storage.
//! - The hosted card element is an opaque collaborator behind the
//!   [`checkout::CardGateway`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use glownest_storefront::api::ApiClient;
//! use glownest_storefront::config::StorefrontConfig;
//! use glownest_storefront::session::Session;
//!
//! let config = StorefrontConfig::from_env()?;
//! let client = ApiClient::new(&config)?;
//! let session = Session::authenticated(token);
//!
//! let catalog = client.catalog(&session).await?;
//! let wishlist = client.wishlist(&session).await?;
//! let picks = glownest_storefront::recommend::recommend(&wishlist, &catalog);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod recommend;
pub mod session;
pub mod wishlist;
