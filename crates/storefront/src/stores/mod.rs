//! Stores: the only code allowed to mutate [`AppState`](crate::AppState).
//!
//! Each store owns one slice of behaviour and shares the same
//! [`StateBus`](crate::StateBus) and [`Persistence`](crate::Persistence).
//! Every mutation updates memory, persists the affected slice, then
//! republishes, all under the bus lock.
//!
//! Stores are generic over the API traits so they can run against the real
//! [`ApiClient`](crate::api::ApiClient) or an in-memory fake.

mod cart;
mod catalog;
mod error;
mod session;

#[cfg(test)]
pub(crate) mod fake;

pub use cart::CartStore;
pub use catalog::CatalogStore;
pub use error::{AuthError, CatalogError, CheckoutError};
pub use session::SessionStore;
