//! Unified error handling with Sentry integration.
//!
//! Each store has its own error enum; [`StorefrontError`] unifies them for
//! callers that drive several stores (the CLI, integration tests). None of
//! these errors is fatal: the worst case is an error state the user clears by
//! retrying.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::stores::{AuthError, CatalogError, CheckoutError};

/// Local validation failure. No network call is made when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required form field is blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// A field has a value that cannot be used.
    #[error("{field} is invalid: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Backend call failed outside any store.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Login failed (bad credentials or unreachable backend).
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Catalog load or product creation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Checkout was refused or failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Local input validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Referenced product is not in the catalog.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StorefrontError {
    /// Short message suitable for a transient status line.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(_) => "Invalid Credentials".to_string(),
            Self::Validation(err) => err.to_string(),
            Self::Catalog(CatalogError::Load(_)) => "Could not load products".to_string(),
            Self::Catalog(_) => "Could not save product".to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Config(_) | Self::Api(_) => "Something went wrong".to_string(),
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Set the Sentry user context from the signed-in email.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "hfdwf0")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
