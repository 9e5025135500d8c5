//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GLOWNEST_API_BASE_URL` - Base URL of the GlowNest backend (e.g., <https://api.glownest.store>)
//!
//! ## Optional
//! - `GLOWNEST_CURRENCY` - ISO 4217 currency code for checkout (default: AUD)
//! - `GLOWNEST_STRIPE_PUBLISHABLE_KEY` - Publishable key for the hosted card
//!   gateway; checkout fails fast without it
//! - `GLOWNEST_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 30)

use std::time::Duration;

use thiserror::Error;
use url::Url;

use glownest_core::CurrencyCode;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the GlowNest backend, without a trailing slash
    pub api_base_url: String,
    /// Currency used for checkout payloads
    pub currency: CurrencyCode,
    /// Publishable key for the hosted card gateway
    pub stripe_publishable_key: Option<String>,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url(
            "GLOWNEST_API_BASE_URL",
            &get_required_env("GLOWNEST_API_BASE_URL")?,
        )?;

        let currency = get_env_or_default("GLOWNEST_CURRENCY", CurrencyCode::default().code())
            .parse::<CurrencyCode>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GLOWNEST_CURRENCY".to_string(), e.to_string())
            })?;

        let request_timeout_secs = get_env_or_default(
            "GLOWNEST_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("GLOWNEST_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            currency,
            stripe_publishable_key: get_optional_env("GLOWNEST_STRIPE_PUBLISHABLE_KEY"),
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate a base URL and strip any trailing slash so endpoint paths can be
/// appended with `format!`.
fn parse_base_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme: {}", url.scheme()),
        ));
    }
    Ok(value.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let url = parse_base_url("GLOWNEST_API_BASE_URL", "https://api.glownest.store/")
            .expect("valid url");
        assert_eq!(url, "https://api.glownest.store");
    }

    #[test]
    fn base_url_rejects_non_http_schemes() {
        assert!(parse_base_url("GLOWNEST_API_BASE_URL", "ftp://api.glownest.store").is_err());
        assert!(parse_base_url("GLOWNEST_API_BASE_URL", "not a url").is_err());
    }
}
