//! Backend API contract and its HTTP client.
//!
//! # Architecture
//!
//! - The stores depend on the [`AuthApi`], [`CatalogApi`] and
//!   [`OrderService`] traits, never on HTTP directly
//! - [`ApiClient`] implements all three over `reqwest`
//! - Tests substitute in-memory fakes
//!
//! # Endpoints
//!
//! - `GET /products` - full catalog
//! - `POST /products` - create one product
//! - `POST /login` - exchange credentials for a bearer token
//! - `POST /orders` - submit a checkout
//!
//! No call retries; a timeout is applied only when configured.

mod client;
pub mod token;
pub mod types;

pub use client::ApiClient;
pub use token::{TokenClaims, TokenError, decode_claims};
pub use types::{Credentials, LoginResponse, Order, OrderItem, Receipt};

use std::future::Future;

use thiserror::Error;

use crate::models::{BearerToken, Product};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connection refused, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: reqwest::StatusCode,
        /// Start of the response body, for diagnostics.
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot be joined with an endpoint path.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status, when the backend answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from the order service.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order could not be delivered or the backend refused it.
    #[error("order service error: {0}")]
    Api(#[from] ApiError),

    /// The backend accepted the request but the receipt is unusable.
    #[error("order rejected: {0}")]
    Rejected(String),
}

/// Authentication endpoint.
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a bearer token.
    ///
    /// Any non-200 answer is an error.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send;
}

/// Catalog endpoints.
pub trait CatalogApi: Send + Sync {
    /// Fetch the whole product collection in backend order.
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// Create one product and return the stored record.
    fn create_product(
        &self,
        product: &Product,
        token: Option<&BearerToken>,
    ) -> impl Future<Output = Result<Product, ApiError>> + Send;
}

/// External order-processing collaborator used by checkout.
///
/// Stock, payment and fulfilment are the collaborator's business; the client
/// only needs a receipt or an error.
pub trait OrderService: Send + Sync {
    /// Submit an order built from the cart.
    fn submit(
        &self,
        order: &Order,
        token: &BearerToken,
    ) -> impl Future<Output = Result<Receipt, OrderError>> + Send;
}
