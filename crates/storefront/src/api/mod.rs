//! REST client for the GlowNest backend.
//!
//! # Architecture
//!
//! - The backend is the source of truth - no local sync, direct API calls
//! - One [`ApiClient`] with per-resource method groups in submodules
//! - In-memory caching via `moka` for the product catalog (5 minute TTL);
//!   cart, wishlist, and addresses are never cached (mutable state)
//! - Every authenticated call takes an explicit [`Session`](crate::session::Session)
//! - Responses are decoded against explicit schemas in [`types`]; a shape
//!   mismatch is a typed [`ApiError::Decode`], never a silent default

mod account;
mod addresses;
mod cart;
mod orders;
mod payments;
mod products;
pub mod stripe;
mod wishlist;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::StorefrontConfig;
use crate::session::Session;

use types::Product;

/// Catalog cache TTL.
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(300);

/// Errors that can occur when talking to the GlowNest backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (network, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the credentials (401/403).
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected schema.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Error body shape used by the backend for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the GlowNest backend REST API.
///
/// Cheap to clone; all clones share the HTTP connection pool and the catalog
/// cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    catalog_cache: Cache<String, Vec<Product>>,
}

impl ApiClient {
    /// Create a new backend API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        let catalog_cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_base_url.clone(),
                catalog_cache,
            }),
        })
    }

    /// Build a full endpoint URL from a path starting with `/`.
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Start a request with the session's bearer token applied.
    fn request(&self, method: Method, path: &str, session: &Session) -> RequestBuilder {
        let builder = self.inner.http.request(method, self.url(path));
        match session.bearer() {
            Some(bearer) => builder.header(header::AUTHORIZATION, bearer),
            None => builder,
        }
    }

    /// Send a request and decode the JSON response body.
    ///
    /// Maps 401/403 to [`ApiError::Unauthorized`], 404 to
    /// [`ApiError::NotFound`], and any other non-success status to
    /// [`ApiError::Api`] carrying the server's `message` field when present.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(extract_message(&body, status)));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&body, 500),
                "Backend returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_message(&body, status),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body, 500),
                "Failed to decode backend response"
            );
            ApiError::Decode(e.to_string())
        })
    }

    /// Send a request and discard the response body, checking only status.
    async fn send_no_body(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_message(&body, status),
            });
        }
        Ok(())
    }
}

/// Pull the backend's `message` field from an error body, falling back to a
/// generic status line.
fn extract_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"))
}

fn truncate(body: &str, limit: usize) -> String {
    body.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_message_prefers_server_message() {
        let body = r#"{"message":"Cart is empty"}"#;
        assert_eq!(
            extract_message(body, StatusCode::BAD_REQUEST),
            "Cart is empty"
        );
    }

    #[test]
    fn extract_message_falls_back_on_garbage_body() {
        assert_eq!(
            extract_message("<html>oops</html>", StatusCode::BAD_GATEWAY),
            "HTTP 502 Bad Gateway"
        );
        assert_eq!(
            extract_message(r#"{"message":""}"#, StatusCode::BAD_REQUEST),
            "HTTP 400 Bad Request"
        );
    }

    #[test]
    fn api_error_display() {
        let err = ApiError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");
        assert_eq!(ApiError::Unauthorized.to_string(), "Unauthorized");
    }
}
