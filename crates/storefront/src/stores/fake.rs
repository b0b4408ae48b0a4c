//! In-memory backend for store tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use tokio::sync::Notify;

use ny_pizza_core::{Price, ProductId};

use crate::api::token::tests::token_with_payload;
use crate::api::{
    ApiError, AuthApi, CatalogApi, Credentials, LoginResponse, Order, OrderError, OrderService,
    Receipt,
};
use crate::bus::StateBus;
use crate::models::{BearerToken, Product};
use crate::persistence::Persistence;
use crate::storage::{KeyValueStore, MemoryStore};

/// Password the fake answers 401 to.
pub(crate) const REJECTED_PASSWORD: &str = "bad";

#[derive(Default)]
pub(crate) struct FakeBackend {
    pub(crate) products: Mutex<Vec<Product>>,
    pub(crate) orders: Mutex<Vec<Order>>,
    pub(crate) fail_catalog: AtomicBool,
    pub(crate) fail_create: AtomicBool,
    pub(crate) fail_orders: AtomicBool,
    calls: AtomicUsize,
    held_logins: Mutex<HashMap<String, Arc<Notify>>>,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn status(status: StatusCode) -> ApiError {
    ApiError::Status {
        status,
        body: String::new(),
    }
}

impl FakeBackend {
    pub(crate) fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            ..Self::default()
        }
    }

    /// Number of backend calls made so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make logins for `email` wait until the returned gate is notified.
    pub(crate) fn hold_login(&self, email: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.held_logins).insert(email.to_string(), Arc::clone(&gate));
        gate
    }
}

impl AuthApi for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let gate = lock(&self.held_logins).get(&credentials.email).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if credentials.password.expose_secret() == REJECTED_PASSWORD {
            return Err(status(StatusCode::UNAUTHORIZED));
        }
        Ok(LoginResponse {
            access_token: token_with_payload(&serde_json::json!({
                "email": credentials.email,
                "sub": "1",
            })),
        })
    }
}

impl CatalogApi for FakeBackend {
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_catalog.load(Ordering::SeqCst) {
            return Err(status(StatusCode::INTERNAL_SERVER_ERROR));
        }
        Ok(lock(&self.products).clone())
    }

    async fn create_product(
        &self,
        product: &Product,
        _token: Option<&BearerToken>,
    ) -> Result<Product, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(status(StatusCode::INTERNAL_SERVER_ERROR));
        }
        lock(&self.products).push(product.clone());
        Ok(product.clone())
    }
}

impl OrderService for FakeBackend {
    async fn submit(&self, order: &Order, _token: &BearerToken) -> Result<Receipt, OrderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_orders.load(Ordering::SeqCst) {
            return Err(OrderError::Api(status(StatusCode::SERVICE_UNAVAILABLE)));
        }
        lock(&self.orders).push(order.clone());
        Ok(Receipt {
            order_id: order.id.clone(),
            item_count: order.item_count(),
            total: order.total,
            placed_at: Utc::now(),
        })
    }
}

/// A bus and persistence adapter over a fresh in-memory store.
pub(crate) fn harness() -> (StateBus, Persistence, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let dyn_store: Arc<dyn KeyValueStore> = store.clone();
    (StateBus::default(), Persistence::new(dyn_store), store)
}

#[allow(clippy::unwrap_used)]
pub(crate) fn pizza(id: &str, price: &str) -> Product {
    Product::new(ProductId::new(id), format!("Pizza {id}"), Price::parse(price).unwrap())
}
