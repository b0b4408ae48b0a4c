//! Persistence adapter for the user and cart slices.
//!
//! Reads never fail: absent or malformed values resolve to the safe default
//! (no user, empty cart) and are logged. Writes are fire-and-forget; a failed
//! write is logged and the in-memory state stays authoritative.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{Cart, User, storage_keys};
use crate::storage::KeyValueStore;

/// State restored from durable storage at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hydrated {
    /// Previously signed-in user, if any.
    pub user: Option<User>,
    /// Previously saved cart, or empty.
    pub cart: Cart,
}

/// Reads and writes the persisted slices of application state.
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
}

impl Persistence {
    /// Create an adapter over a storage backend.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load user and cart. Each key recovers independently.
    #[must_use]
    pub fn hydrate(&self) -> Hydrated {
        let user = self.read::<User>(storage_keys::USER);
        let cart = self
            .read::<Cart>(storage_keys::CART)
            .map(normalize_cart)
            .unwrap_or_default();

        debug!(
            has_user = user.is_some(),
            cart_entries = cart.badge_count(),
            "hydrated persisted state"
        );

        Hydrated { user, cart }
    }

    /// Write the user, or remove the key when `None`.
    pub fn persist_user(&self, user: Option<&User>) {
        match user {
            Some(user) => self.write(storage_keys::USER, user),
            None => {
                if let Err(e) = self.store.remove(storage_keys::USER) {
                    warn!(error = %e, "failed to remove persisted user");
                }
            }
        }
    }

    /// Write the cart mapping.
    pub fn persist_cart(&self, cart: &Cart) {
        self.write(storage_keys::CART, cart);
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "failed to read persisted value, using default");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "discarding corrupt persisted value");
                None
            }
        }
    }

    fn write<T: serde::Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize value for persistence");
                return;
            }
        };

        if let Err(e) = self.store.set(key, &raw) {
            warn!(key, error = %e, "failed to persist value");
        }
    }
}

/// Drop entries whose key does not match their product or whose quantity is
/// zero; a hand-edited file must not break the cart invariants.
fn normalize_cart(cart: Cart) -> Cart {
    let mut clean = Cart::new();
    for entry in cart.entries() {
        if !clean.insert_entry(entry.clone()) {
            warn!(product_id = %entry.id, "dropping invalid persisted cart entry");
        }
    }
    clean
}
