//! CLI command implementations.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod wishlist;

use thiserror::Error;

use glownest_storefront::api::{ApiClient, ApiError};
use glownest_storefront::config::{ConfigError, StorefrontConfig};
use glownest_storefront::session::Session;

/// Errors shared by all CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `GLOWNEST_JWT` is not set for an authenticated command.
    #[error("Not signed in. Run 'gn-cli login' and export GLOWNEST_JWT.")]
    NotSignedIn,

    /// Backend API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Terminal input failed.
    #[error("Input error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the API client and configuration from the environment.
pub fn context() -> Result<(ApiClient, StorefrontConfig), CommandError> {
    dotenvy::dotenv().ok();
    let config = StorefrontConfig::from_env()?;
    let client = ApiClient::new(&config)?;
    Ok((client, config))
}

/// Session for authenticated commands, from `GLOWNEST_JWT`.
pub fn session() -> Result<Session, CommandError> {
    let jwt = std::env::var("GLOWNEST_JWT").map_err(|_| CommandError::NotSignedIn)?;
    let session = Session::authenticated(jwt);
    if session.is_expired() {
        tracing::warn!("GLOWNEST_JWT looks expired; the backend may reject it");
    }
    Ok(session)
}
