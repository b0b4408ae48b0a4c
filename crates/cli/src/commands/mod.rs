//! Command implementations.

pub mod cart;
pub mod catalog;
pub mod session;

use thiserror::Error;

use ny_pizza_storefront::{Route, StorefrontError};

/// Errors that end a command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A store operation failed.
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    /// The form was rejected; the message was already shown.
    #[error("{0}")]
    Rejected(String),

    /// The signed-in user may not run this command.
    #[error("not allowed here, go to {0}")]
    Redirect(Route),
}
