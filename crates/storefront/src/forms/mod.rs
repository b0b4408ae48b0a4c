//! Form view models: field values, validation and a transient status message.
//!
//! Forms hold raw strings exactly as typed and only build typed values on
//! submit. Failed validation never reaches the network.

mod login;
mod product;

use crate::error::ValidationError;

pub use login::LoginForm;
pub use product::ProductForm;

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    /// The submission went through.
    Success,
    /// The submission was rejected or failed.
    Danger,
}

/// Transient status message shown under a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    /// How the message is styled.
    pub level: FlashLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Flash {
    /// A success message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    /// An error message.
    #[must_use]
    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }
}

/// Trimmed value of a required field.
fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(value)
    }
}
