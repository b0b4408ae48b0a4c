//! Domain models for the storefront client.
//!
//! - [`user`] - The signed-in user and its bearer token
//! - [`product`] - Catalog records as exchanged with the backend
//! - [`cart`] - The cart mapping and its entries
//! - [`session`] - Durable storage keys

pub mod cart;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartEntry};
pub use product::Product;
pub use session::keys as storage_keys;
pub use user::{BearerToken, User};
