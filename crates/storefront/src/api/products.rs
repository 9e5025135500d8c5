//! Product catalog methods.
//!
//! The unfiltered catalog is cached for 5 minutes; filtered listings and
//! search queries always go to the backend.

use reqwest::Method;
use tracing::{debug, instrument};

use crate::session::Session;

use super::types::{Product, ProductQuery};
use super::{ApiClient, ApiError};

const CATALOG_CACHE_KEY: &str = "catalog";

impl ApiClient {
    /// Get the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn catalog(&self, session: &Session) -> Result<Vec<Product>, ApiError> {
        if let Some(products) = self.inner.catalog_cache.get(CATALOG_CACHE_KEY).await {
            debug!("Cache hit for catalog");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .send(self.request(Method::GET, "/products", session))
            .await?;

        self.inner
            .catalog_cache
            .insert(CATALOG_CACHE_KEY.to_string(), products.clone())
            .await;

        Ok(products)
    }

    /// Get a filtered product listing.
    ///
    /// An empty filter is served from the catalog cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn list_products(
        &self,
        session: &Session,
        query: &ProductQuery,
    ) -> Result<Vec<Product>, ApiError> {
        if query.is_empty() {
            return self.catalog(session).await;
        }

        let builder = self
            .request(Method::GET, "/products", session)
            .query(&query.to_query_pairs());
        self.send(builder).await
    }

    /// Full-text product search.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session))]
    pub async fn search_products(
        &self,
        session: &Session,
        query: &str,
    ) -> Result<Vec<Product>, ApiError> {
        let builder = self
            .request(Method::GET, "/products/search", session)
            .query(&[("query", query)]);
        self.send(builder).await
    }

    /// Invalidate the cached catalog.
    pub async fn invalidate_catalog(&self) {
        self.inner.catalog_cache.invalidate(CATALOG_CACHE_KEY).await;
    }
}
