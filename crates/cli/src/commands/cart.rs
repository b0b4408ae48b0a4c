//! Cart and checkout commands.

use ny_pizza_core::ProductId;
use ny_pizza_storefront::api::ApiClient;
use ny_pizza_storefront::{Access, AuthGuard, Storefront, StorefrontError};

use super::CommandError;
use crate::view;

pub fn show(app: &Storefront<ApiClient>) {
    view::cart(&app.snapshot().cart);
}

/// Add one unit of a catalog product.
///
/// # Errors
///
/// Returns `CommandError::Storefront` if the id is not in the catalog.
pub fn add(app: &Storefront<ApiClient>, id: &str) -> Result<(), CommandError> {
    let quantity = app.add_to_cart_by_id(&ProductId::new(id))?;
    view::message(&format!("{id}: {quantity} in cart"));
    Ok(())
}

pub fn remove(app: &Storefront<ApiClient>, id: &str) {
    match app.remove_from_cart(&ProductId::new(id)) {
        Some(0) => view::message(&format!("{id}: removed")),
        Some(quantity) => view::message(&format!("{id}: {quantity} in cart")),
        None => view::message(&format!("{id}: not in cart")),
    }
}

pub fn clear(app: &Storefront<ApiClient>) {
    app.clear_cart();
    view::message("Cart cleared.");
}

/// Order the cart contents.
///
/// # Errors
///
/// Returns `CommandError::Redirect` when signed out and
/// `CommandError::Storefront` if the order fails.
pub async fn checkout(app: &Storefront<ApiClient>) -> Result<(), CommandError> {
    if let Access::Redirect(route) = AuthGuard::signed_in(&app.snapshot()) {
        return Err(CommandError::Redirect(route));
    }

    let receipt = app.checkout().await.map_err(StorefrontError::from)?;
    view::receipt(&receipt);
    Ok(())
}
