//! Store error types.

use thiserror::Error;

use crate::api::{ApiError, OrderError, TokenError};

/// Login failure.
///
/// Every variant collapses into the same user-facing outcome; the detail is
/// kept for logs.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Network failure or non-200 answer from `/login`.
    #[error("login request failed: {0}")]
    Failed(#[from] ApiError),

    /// The backend answered 200 but the token payload is unusable.
    #[error("login token is invalid: {0}")]
    InvalidToken(#[from] TokenError),

    /// A newer login or a logout was issued while this one was in flight.
    #[error("login superseded by a newer session change")]
    Superseded,
}

/// Catalog failure.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Fetching the product collection failed.
    #[error("failed to load products: {0}")]
    Load(#[source] ApiError),

    /// The backend refused to create a product.
    #[error("failed to create product: {0}")]
    Create(#[source] ApiError),

    /// A newer load was started while this one was in flight.
    #[error("catalog load superseded by a newer one")]
    Superseded,
}

/// Checkout failure. The cart is left untouched in every case.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No user is signed in.
    #[error("Log in to check out")]
    NotLoggedIn,

    /// Nothing to order.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The cart total is too large to charge.
    #[error("Order total is too large")]
    TotalOverflow,

    /// The order service failed or refused the order.
    #[error("Order failed: {0}")]
    Order(#[from] OrderError),
}
