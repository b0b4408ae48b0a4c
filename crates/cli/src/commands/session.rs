//! Session commands.

use ny_pizza_storefront::Storefront;
use ny_pizza_storefront::api::ApiClient;
use ny_pizza_storefront::forms::LoginForm;

use super::CommandError;
use crate::view;

/// Sign in with the given credentials.
///
/// # Errors
///
/// Returns `CommandError::Rejected` if the fields are blank or the backend
/// refused the credentials.
pub async fn login(
    app: &Storefront<ApiClient>,
    email: String,
    password: String,
) -> Result<(), CommandError> {
    let mut form = LoginForm::new(email, password);
    if form.submit(app.session()).await {
        whoami(app);
        return Ok(());
    }

    let message = form
        .flash
        .map_or_else(|| "Login failed".to_string(), |flash| flash.message);
    Err(CommandError::Rejected(message))
}

/// Sign out. Does nothing when already signed out.
pub fn logout(app: &Storefront<ApiClient>) {
    app.logout();
    view::message("Signed out.");
}

/// Show the signed-in user.
pub fn whoami(app: &Storefront<ApiClient>) {
    match &app.snapshot().user {
        Some(user) => {
            let role = if user.is_admin() { "admin" } else { "customer" };
            view::message(&format!("{} ({role})", user.email));
        }
        None => view::message("Not signed in."),
    }
}
