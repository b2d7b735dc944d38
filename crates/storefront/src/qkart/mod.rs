//! QKART backend REST API.
//!
//! # Architecture
//!
//! - [`CommerceApi`] is the seam the catalog controller talks to; the
//!   production implementation is [`QkartClient`] (`reqwest`, JSON).
//! - The backend is the source of truth - no local caching, direct API calls.
//!
//! # Endpoints
//!
//! | Method | Path                            | Auth   | Success         |
//! |--------|---------------------------------|--------|-----------------|
//! | GET    | `/products`                     | -      | `[Product]`     |
//! | GET    | `/products/search?value=<text>` | -      | `[Product]`     |
//! | GET    | `/cart`                         | Bearer | `[CartEntry]`   |
//! | POST   | `/cart` `{productId, qty}`      | Bearer | `[CartEntry]`   |
//!
//! Failures carry `{ "success": false, "message": "..." }`.
//!
//! # Example
//!
//! ```rust,ignore
//! use qkart_storefront::qkart::{CommerceApi, QkartClient};
//!
//! let client = QkartClient::new(&config);
//! let products = client.get_products().await?;
//! let cart = client.add_to_cart(&token, &products[0].id, 1).await?;
//! ```

mod client;
pub mod types;

pub use client::QkartClient;

use async_trait::async_trait;
use qkart_core::{CartEntry, Product, ProductId};
use reqwest::StatusCode;
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can occur when talking to the QKART backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: DNS, connection refused, TLS, body read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status with a `{success:false, message}` payload.
    #[error("Server error ({status}): {message}")]
    Server { status: StatusCode, message: String },

    /// Non-success status without a usable payload.
    #[error("Unexpected status: {0}")]
    Status(StatusCode),

    /// Success status but the body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status of the response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Status(status) => Some(*status),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }

    /// Whether the backend answered 404 (a search with no matches).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// The backend's human-readable message, if the error response carried one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Server message when the response had exactly `status`.
    #[must_use]
    pub fn server_message_for(&self, status: StatusCode) -> Option<&str> {
        match self {
            Self::Server {
                status: actual,
                message,
            } if *actual == status => Some(message),
            _ => None,
        }
    }
}

/// Operations the storefront needs from the commerce backend.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// Full product catalog.
    async fn get_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Server-side product search. A 404 means "no matches".
    async fn search_products(&self, text: &str) -> Result<Vec<Product>, ApiError>;

    /// Cart entries of the user owning `token`.
    async fn get_cart(&self, token: &SecretString) -> Result<Vec<CartEntry>, ApiError>;

    /// Set the quantity of `product_id` (0 removes it). Returns the full updated cart.
    async fn add_to_cart(
        &self,
        token: &SecretString,
        product_id: &ProductId,
        qty: u32,
    ) -> Result<Vec<CartEntry>, ApiError>;
}
