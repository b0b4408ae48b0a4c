//! NY Pizza Core - Shared types library.
//!
//! This crate provides common types used across all NY Pizza components:
//! - `storefront` - Client-side application state (session, catalog, cart)
//! - `cli` - Terminal front end driving the storefront core
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and access levels

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
