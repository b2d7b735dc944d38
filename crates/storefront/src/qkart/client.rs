//! `reqwest` implementation of [`CommerceApi`].

use std::sync::Arc;

use async_trait::async_trait;
use qkart_core::{CartEntry, Product, ProductId};
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::types::{CartUpdateRequest, ErrorPayload};
use super::{ApiError, CommerceApi};

/// How much of an unexpected body to keep in logs.
const LOG_BODY_CHARS: usize = 500;

// =============================================================================
// QkartClient
// =============================================================================

/// Client for the QKART REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct QkartClient {
    inner: Arc<QkartClientInner>,
}

struct QkartClientInner {
    client: reqwest::Client,
    endpoint: String,
}

impl QkartClient {
    /// Create a new client for the backend at `endpoint`
    /// (for example `https://host/api/v1`).
    #[must_use]
    pub fn new(endpoint: &Url) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, endpoint: &Url) -> Self {
        Self {
            inner: Arc::new(QkartClientInner {
                client,
                endpoint: endpoint.as_str().trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Base URL requests are made against.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.endpoint)
    }

    /// Send a request and decode a JSON success body.
    ///
    /// Error statuses become [`ApiError::Server`] when the body carries a
    /// `message`, otherwise [`ApiError::Status`].
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorPayload>(&body) {
                Ok(payload) => {
                    tracing::debug!(
                        status = %status,
                        message = %payload.message,
                        "QKART API returned an error payload"
                    );
                    ApiError::Server {
                        status,
                        message: payload.message,
                    }
                }
                Err(_) => {
                    tracing::warn!(
                        status = %status,
                        body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
                        "QKART API returned non-success status without a message"
                    );
                    ApiError::Status(status)
                }
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
                "Failed to parse QKART API response"
            );
            ApiError::Parse(e)
        })
    }
}

fn bearer(token: &SecretString) -> String {
    format!("Bearer {}", token.expose_secret())
}

#[async_trait]
impl CommerceApi for QkartClient {
    #[instrument(skip(self))]
    async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        let request = self.inner.client.get(self.url("/products"));
        self.execute(request).await
    }

    #[instrument(skip(self))]
    async fn search_products(&self, text: &str) -> Result<Vec<Product>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url("/products/search"))
            .query(&[("value", text)]);
        self.execute(request).await
    }

    #[instrument(skip(self, token))]
    async fn get_cart(&self, token: &SecretString) -> Result<Vec<CartEntry>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url("/cart"))
            .header(reqwest::header::AUTHORIZATION, bearer(token));
        self.execute(request).await
    }

    #[instrument(skip(self, token), fields(product_id = %product_id))]
    async fn add_to_cart(
        &self,
        token: &SecretString,
        product_id: &ProductId,
        qty: u32,
    ) -> Result<Vec<CartEntry>, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("/cart"))
            .header(reqwest::header::AUTHORIZATION, bearer(token))
            .json(&CartUpdateRequest { product_id, qty });
        self.execute(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let client = QkartClient::new(&Url::parse("http://127.0.0.1:8082").unwrap());
        assert_eq!(client.endpoint(), "http://127.0.0.1:8082");
        assert_eq!(client.url("/products"), "http://127.0.0.1:8082/products");
    }

    #[test]
    fn test_endpoint_with_path() {
        let client = QkartClient::new(&Url::parse("https://qkart.example/api/v1").unwrap());
        assert_eq!(client.url("/cart"), "https://qkart.example/api/v1/cart");
    }

    #[test]
    fn test_bearer_header() {
        let token = SecretString::from("abc.def");
        assert_eq!(bearer(&token), "Bearer abc.def");
    }
}
