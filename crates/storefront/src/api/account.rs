//! Account and authentication methods.
//!
//! Sign-in and registration are the only unauthenticated calls in the crate;
//! they return a JWT which the caller wraps in a
//! [`Session`](crate::session::Session).

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use crate::session::Session;

use super::types::{AuthTokens, Profile, ProfileUpdate, RegisterRequest};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, ApiError> {
        let builder = self
            .request(Method::POST, "/login", &Session::anonymous())
            .json(&json!({ "email": email, "password": password }));
        self.send(builder).await
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthTokens, ApiError> {
        let builder = self
            .request(Method::POST, "/register", &Session::anonymous())
            .json(request);
        self.send(builder).await
    }

    /// Ask the backend to email a password-reset link.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, "/request-password-reset", &Session::anonymous())
            .json(&json!({ "email": email }));
        self.send_no_body(builder).await
    }

    /// Complete a password reset with the emailed token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, "/reset-password", &Session::anonymous())
            .json(&json!({ "token": token, "password": password }));
        self.send_no_body(builder).await
    }

    /// Get the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn me(&self, session: &Session) -> Result<Profile, ApiError> {
        self.send(self.request(Method::GET, "/me", session)).await
    }

    /// Update the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<Profile, ApiError> {
        let builder = self.request(Method::PUT, "/me", session).json(update);
        self.send(builder).await
    }
}
