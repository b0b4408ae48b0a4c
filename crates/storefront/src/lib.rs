//! NY Pizza storefront client core.
//!
//! Session, catalog and cart state for a storefront client, persisted to a
//! local key-value store and broadcast to any number of subscribers.
//!
//! # Architecture
//!
//! - [`Storefront`] - root handle wiring the stores to one [`StateBus`]
//! - [`stores`] - the only code that mutates [`AppState`]
//! - [`api`] - backend contract and its `reqwest` client
//! - [`persistence`] / [`storage`] - durable user and cart
//! - [`guard`], [`nav`], [`forms`] - view models derived from state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
mod app;
pub mod bus;
pub mod config;
pub mod error;
pub mod forms;
pub mod guard;
pub mod models;
pub mod nav;
pub mod persistence;
pub mod state;
pub mod storage;
pub mod stores;

pub use app::Storefront;
pub use bus::{StateBus, Subscriber, SubscriberId};
pub use config::StorefrontConfig;
pub use error::{StorefrontError, ValidationError};
pub use guard::{Access, AdminOnly, AuthGuard};
pub use nav::{NavBar, Route};
pub use persistence::{Hydrated, Persistence};
pub use state::{AppState, CatalogStatus};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
