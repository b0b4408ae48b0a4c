//! `reqwest` implementation of the backend contract.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::types::{Credentials, LoginResponse, Order, Receipt};
use super::{ApiError, AuthApi, CatalogApi, OrderError, OrderService};
use crate::config::ApiConfig;
use crate::models::{BearerToken, Product};

/// Longest body excerpt kept in errors and logs.
const BODY_EXCERPT: usize = 200;

/// HTTP client for the storefront backend.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client: builder.build()?,
                base_url: with_trailing_slash(config.base_url.clone()),
            }),
        })
    }

    /// The backend origin requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.inner.base_url.join(path.trim_start_matches('/'))?;
        Ok(self.inner.client.request(method, url))
    }

    /// Send a request and decode a JSON body from any 2xx answer.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        expected: impl Fn(StatusCode) -> bool + Send,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !expected(status) {
            debug!(
                status = %status,
                body = %excerpt(&body),
                "backend returned unexpected status"
            );
            return Err(ApiError::Status {
                status,
                body: excerpt(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&body),
                "failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }
}

impl AuthApi for ApiClient {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let request = self.request(Method::POST, "login")?.json(&credentials.body());
        // Only 200 counts as a successful login
        self.send_json(request, |status| status == StatusCode::OK)
            .await
    }
}

impl CatalogApi for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        let request = self.request(Method::GET, "products")?;
        let products: Vec<Product> = self
            .send_json(request, |status| status.is_success())
            .await?;
        debug!(count = products.len(), "fetched products");
        Ok(products)
    }

    #[instrument(skip(self, product, token), fields(product_id = %product.id))]
    async fn create_product(
        &self,
        product: &Product,
        token: Option<&BearerToken>,
    ) -> Result<Product, ApiError> {
        let mut request = self.request(Method::POST, "products")?.json(product);
        if let Some(token) = token {
            request = request.bearer_auth(token.expose());
        }
        self.send_json(request, |status| status.is_success()).await
    }
}

impl OrderService for ApiClient {
    #[instrument(skip(self, order, token), fields(order_id = %order.id))]
    async fn submit(&self, order: &Order, token: &BearerToken) -> Result<Receipt, OrderError> {
        let request = self
            .request(Method::POST, "orders")?
            .bearer_auth(token.expose())
            .json(order);
        let stored: Order = self
            .send_json(request, |status| status.is_success())
            .await?;

        if stored.id != order.id {
            return Err(OrderError::Rejected(format!(
                "backend stored order as {} instead of {}",
                stored.id, order.id
            )));
        }

        let item_count = stored.item_count();
        Ok(Receipt {
            order_id: stored.id,
            item_count,
            total: stored.total,
            placed_at: stored.created_at,
        })
    }
}

/// Make `Url::join` append to the base path instead of replacing its last
/// segment.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT).collect()
}
