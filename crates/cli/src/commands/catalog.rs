//! Catalog commands.

use ny_pizza_storefront::api::ApiClient;
use ny_pizza_storefront::forms::ProductForm;
use ny_pizza_storefront::{Access, AuthGuard, Storefront, StorefrontError};

use super::CommandError;
use crate::view;

/// List the catalog fetched at startup.
pub fn list(app: &Storefront<ApiClient>) {
    view::products(&app.snapshot().products);
}

/// Fetch the catalog again and list it.
///
/// # Errors
///
/// Returns `CommandError::Storefront` if the fetch fails.
pub async fn reload(app: &Storefront<ApiClient>) -> Result<(), CommandError> {
    app.reload().await.map_err(StorefrontError::from)?;
    list(app);
    Ok(())
}

/// Create a product from the form fields.
///
/// # Errors
///
/// Returns `CommandError::Redirect` unless an admin is signed in, and
/// `CommandError::Rejected` if validation or the backend refused.
pub async fn add_product(
    app: &Storefront<ApiClient>,
    mut form: ProductForm,
) -> Result<(), CommandError> {
    if let Access::Redirect(route) = AuthGuard::admin(&app.snapshot()) {
        return Err(CommandError::Redirect(route));
    }

    let result = form.submit(app.catalog()).await;
    if let Some(flash) = &form.flash {
        view::flash(flash);
    }

    match result {
        Ok(product) => {
            view::products(std::slice::from_ref(&product));
            Ok(())
        }
        Err(e) => {
            tracing::debug!(error = %e, "add-product rejected");
            Err(CommandError::Rejected(e.user_message()))
        }
    }
}
