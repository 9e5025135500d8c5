//! Address book methods (not cached - mutable state).

use reqwest::Method;
use tracing::instrument;

use glownest_core::AddressId;

use crate::checkout::AddressDirectory;
use crate::session::Session;

use super::types::{Address, AddressInput};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Get the user's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn addresses(&self, session: &Session) -> Result<Vec<Address>, ApiError> {
        self.send(self.request(Method::GET, "/me/addresses", session))
            .await
    }

    /// Create a new address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn create_address(
        &self,
        session: &Session,
        input: &AddressInput,
    ) -> Result<Address, ApiError> {
        let builder = self
            .request(Method::POST, "/me/addresses", session)
            .json(input);
        self.send(builder).await
    }

    /// Update an existing address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session, input), fields(address_id = %address_id))]
    pub async fn update_address(
        &self,
        session: &Session,
        address_id: &AddressId,
        input: &AddressInput,
    ) -> Result<Address, ApiError> {
        let builder = self
            .request(
                Method::PATCH,
                &format!("/me/addresses/{address_id}"),
                session,
            )
            .json(input);
        self.send(builder).await
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session), fields(address_id = %address_id))]
    pub async fn delete_address(
        &self,
        session: &Session,
        address_id: &AddressId,
    ) -> Result<(), ApiError> {
        let builder = self.request(
            Method::DELETE,
            &format!("/me/addresses/{address_id}"),
            session,
        );
        self.send_no_body(builder).await
    }

    /// Mark an address as the default; returns the updated list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session), fields(address_id = %address_id))]
    pub async fn set_default_address(
        &self,
        session: &Session,
        address_id: &AddressId,
    ) -> Result<Vec<Address>, ApiError> {
        let builder = self.request(
            Method::POST,
            &format!("/me/addresses/{address_id}/default"),
            session,
        );
        self.send(builder).await
    }
}

impl AddressDirectory for ApiClient {
    async fn list(&self, session: &Session) -> Result<Vec<Address>, ApiError> {
        self.addresses(session).await
    }
}
