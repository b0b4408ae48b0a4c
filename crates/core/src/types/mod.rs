//! Core types for NY Pizza.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod access;
pub mod email;
pub mod id;
pub mod price;

pub use access::{AccessLevel, AccessLevelError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
