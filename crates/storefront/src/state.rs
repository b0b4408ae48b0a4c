//! Application state published to every subscriber.

use crate::models::{Cart, Product, User};

/// Catalog load lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogStatus {
    /// Fetch in flight (or not started yet).
    #[default]
    Loading,
    /// Products were fetched.
    Ready,
    /// The fetch failed; the message is shown to the user until a reload.
    Error(String),
}

/// The single shared state object.
///
/// Subscribers always receive the whole value; there is no partial
/// subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Signed-in user, if any.
    pub user: Option<User>,
    /// Cart mapping.
    pub cart: Cart,
    /// Catalog, in backend order, then in creation order.
    pub products: Vec<Product>,
    /// Catalog load status.
    pub catalog: CatalogStatus,
}

impl AppState {
    /// Whether the current user may see admin-only surfaces.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Find a product by id.
    #[must_use]
    pub fn product(&self, id: &ny_pizza_core::ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }
}
