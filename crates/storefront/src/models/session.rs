//! Session-related storage keys.
//!
//! The values stored under these keys are the JSON serializations of
//! [`User`](super::User) and [`Cart`](super::Cart). Each key is written
//! independently and recovers to a safe default on its own.

/// Durable storage keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const USER: &str = "user";

    /// Key for storing the cart mapping.
    pub const CART: &str = "cart";
}
