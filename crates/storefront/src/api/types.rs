//! Request and response bodies exchanged with the backend.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use ny_pizza_core::{Email, OrderId, Price, ProductId};

use crate::models::Cart;

/// Login form input.
///
/// The password is kept secret in memory and only exposed when the request
/// body is built.
#[derive(Clone)]
pub struct Credentials {
    /// Email as typed by the user.
    pub email: String,
    /// Password as typed by the user.
    pub password: SecretString,
}

impl Credentials {
    /// Bundle an email and password.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub(crate) fn body(&self) -> LoginBody<'_> {
        LoginBody {
            email: &self.email,
            password: self.password.expose_secret(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// `POST /login` body.
#[derive(Serialize)]
pub(crate) struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// `POST /login` success body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token whose payload carries at least an `email` claim.
    pub access_token: String,
}

/// One order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Ordered product.
    pub product_id: ProductId,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price at the time of checkout.
    pub unit_price: Price,
}

/// `POST /orders` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Client-generated order id.
    pub id: OrderId,
    /// Customer placing the order.
    pub email: Email,
    /// Cart lines.
    pub items: Vec<OrderItem>,
    /// Cart subtotal.
    pub total: Price,
    /// When checkout was started.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build an order from the current cart.
    ///
    /// Returns `None` if the cart total does not fit a price.
    #[must_use]
    pub fn from_cart(email: Email, cart: &Cart) -> Option<Self> {
        Some(Self {
            id: OrderId::generate(),
            email,
            items: cart
                .entries()
                .map(|entry| OrderItem {
                    product_id: entry.id.clone(),
                    quantity: entry.quantity,
                    unit_price: entry.product.price,
                })
                .collect(),
            total: cart.subtotal()?,
            created_at: Utc::now(),
        })
    }

    /// Sum of all quantities, saturating at `u32::MAX`.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |total: u32, item| total.saturating_add(item.quantity))
    }
}

/// Confirmation that the order service accepted an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Id the order was stored under.
    pub order_id: OrderId,
    /// Units ordered.
    pub item_count: u32,
    /// Amount charged.
    pub total: Price,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
}
