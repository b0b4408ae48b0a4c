//! Integration tests for the NY Pizza storefront client.
//!
//! The tests drive a real [`Storefront`] over HTTP against [`MockBackend`],
//! an axum server bound to an ephemeral local port that imitates the
//! storefront backend:
//!
//! - `GET /products` / `POST /products`
//! - `POST /login` (answers an unsigned JWT, or 401 for [`REJECTED_PASSWORD`])
//! - `POST /orders` (requires a bearer token)
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ny-pizza-integration-tests
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use ny_pizza_storefront::{Storefront, StorefrontConfig, StorefrontError};

/// Password the mock rejects with 401.
pub const REJECTED_PASSWORD: &str = "bad";

/// Everything the mock has stored or been told.
#[derive(Default)]
struct Recorded {
    products: Vec<Value>,
    created: Vec<Value>,
    orders: Vec<Value>,
    fail_products: bool,
    fail_orders: bool,
    requests: HashMap<&'static str, usize>,
    held_logins: HashMap<String, Arc<Notify>>,
}

#[derive(Clone, Default)]
struct MockState(Arc<Mutex<Recorded>>);

impl MockState {
    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn hit(&self, route: &'static str) -> MutexGuard<'_, Recorded> {
        let mut recorded = self.lock();
        *recorded.requests.entry(route).or_default() += 1;
        recorded
    }
}

/// A running mock backend. The server stops when this is dropped.
pub struct MockBackend {
    addr: SocketAddr,
    state: MockState,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Start a backend serving `products` from `GET /products`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if no local port can be bound.
    pub async fn start(products: Vec<Value>) -> std::io::Result<Self> {
        let state = MockState::default();
        state.lock().products = products;

        let app = Router::new()
            .route("/products", get(list_products).post(create_product))
            .route("/login", post(login))
            .route("/orders", post(create_order))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            server,
        })
    }

    /// Backend origin.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A storefront pointed at this backend, persisting under `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError` if the configuration or client is invalid.
    pub fn storefront(&self, data_dir: &Path) -> Result<Storefront, StorefrontError> {
        let vars = HashMap::from([
            ("STOREFRONT_API_URL", self.url()),
            ("STOREFRONT_DATA_DIR", data_dir.display().to_string()),
            ("STOREFRONT_HTTP_TIMEOUT_SECS", "10".to_string()),
        ]);
        let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned())?;
        Storefront::from_config(&config)
    }

    /// Make `GET /products` answer 500 until reset.
    pub fn fail_products(&self, fail: bool) {
        self.state.lock().fail_products = fail;
    }

    /// Make `POST /orders` answer 503 until reset.
    pub fn fail_orders(&self, fail: bool) {
        self.state.lock().fail_orders = fail;
    }

    /// Hold logins for `email` until the returned gate is notified.
    pub fn hold_login(&self, email: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state
            .lock()
            .held_logins
            .insert(email.to_string(), Arc::clone(&gate));
        gate
    }

    /// Number of requests received on a route (`"products"`, `"create"`,
    /// `"login"`, `"orders"`).
    #[must_use]
    pub fn requests(&self, route: &str) -> usize {
        self.state.lock().requests.get(route).copied().unwrap_or(0)
    }

    /// Bodies received by `POST /products`.
    #[must_use]
    pub fn created(&self) -> Vec<Value> {
        self.state.lock().created.clone()
    }

    /// Bodies received by `POST /orders`.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        self.state.lock().orders.clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Build an unsigned JWT whose payload carries `email`.
#[must_use]
pub fn unsigned_token(email: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({
            "email": email,
            "sub": "1",
            "iat": 1_600_000_000,
            "exp": 1_600_003_600,
        })
        .to_string(),
    );
    format!("{header}.{payload}.not-a-signature")
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(State(state): State<MockState>) -> Response {
    let recorded = state.hit("products");
    if recorded.fail_products {
        return (StatusCode::INTERNAL_SERVER_ERROR, "catalog unavailable").into_response();
    }
    Json(recorded.products.clone()).into_response()
}

async fn create_product(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let mut recorded = state.hit("create");
    recorded.created.push(body.clone());
    recorded.products.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(state): State<MockState>, Json(body): Json<LoginBody>) -> Response {
    let gate = state.hit("login").held_logins.get(&body.email).cloned();
    if let Some(gate) = gate {
        gate.notified().await;
    }

    if body.password == REJECTED_PASSWORD {
        return (StatusCode::UNAUTHORIZED, Json(json!("Incorrect password"))).into_response();
    }
    Json(json!({ "accessToken": unsigned_token(&body.email) })).into_response()
}

async fn create_order(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut recorded = state.hit("orders");

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("Bearer "));
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if recorded.fail_orders {
        return (StatusCode::SERVICE_UNAVAILABLE, "payments down").into_response();
    }

    recorded.orders.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}
