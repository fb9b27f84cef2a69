//! Curator HTTP Client
//!
//! A typed HTTP client for the managed curation service.
//!
//! The service owns storage, article ingestion, and newsletter generation;
//! this crate is the single place where its REST facade is spelled out, so
//! the CLI and poller bindings share one set of endpoints and error
//! handling.
//!
//! # Example
//!
//! ```no_run
//! use curator_client::CuratorClient;
//! use curator_core::dto::article::ArticleQuery;
//!
//! # async fn example() -> curator_client::Result<()> {
//! let client = CuratorClient::new("http://localhost:8080");
//!
//! let articles = client.list_articles(&ArticleQuery::default()).await?;
//! println!("{} article(s) available", articles.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
mod articles;
mod newsletters;

pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP client for the curation service API
///
/// Provides methods for the endpoints the toolkit consumes, organized into
/// logical groups:
/// - Article browsing (list with server-side filters, get)
/// - Newsletter lifecycle (create/trigger generation, get, list, delete)
#[derive(Debug, Clone)]
pub struct CuratorClient {
    /// Base URL of the curation service (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl CuratorClient {
    /// Create a new curator client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the curation service
    ///
    /// # Example
    /// ```
    /// use curator_client::CuratorClient;
    ///
    /// let client = CuratorClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new curator client with a custom HTTP client
    ///
    /// Allows configuring timeouts, proxies, TLS settings, etc.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the curation service
    /// * `client` - A configured reqwest Client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the curation service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the
    /// request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            debug!("Request rejected with status {}: {}", status, message);
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g., DELETE operations)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            debug!("Request rejected with status {}: {}", status, message);
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = CuratorClient::new("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = CuratorClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = CuratorClient::with_client("http://localhost:8080", http_client);
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
