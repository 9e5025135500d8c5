//! GlowNest Core - Shared types library.
//!
//! This crate provides common types used across all GlowNest components:
//! - `storefront` - Headless client for the GlowNest backend
//! - `cli` - Command-line tools for browsing, cart, and wishlist
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
