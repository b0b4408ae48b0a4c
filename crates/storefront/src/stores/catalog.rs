//! Catalog store: startup fetch and product creation.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::CatalogError;
use crate::api::CatalogApi;
use crate::bus::{Generation, StateBus};
use crate::error::add_breadcrumb;
use crate::models::Product;
use crate::state::CatalogStatus;

/// Owns the `products` slice of state and its load status.
pub struct CatalogStore<C> {
    api: Arc<C>,
    bus: StateBus,
    generation: Arc<Generation>,
}

impl<C> Clone for CatalogStore<C> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            bus: self.bus.clone(),
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<C: CatalogApi> CatalogStore<C> {
    /// Create a catalog store.
    #[must_use]
    pub fn new(api: Arc<C>, bus: StateBus) -> Self {
        Self {
            api,
            bus,
            generation: Arc::new(Generation::default()),
        }
    }

    /// Fetch the whole catalog once.
    ///
    /// Moves the status to `Loading`, then to `Ready` with the fetched list or
    /// to `Error` with a message. There is no retry; call
    /// [`reload`](Self::reload) after a failure.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Load` if the fetch fails and
    /// `CatalogError::Superseded` if a newer load finished first. The error
    /// is also reflected in state, so callers may ignore it.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<usize, CatalogError> {
        let ticket = self.generation.begin();
        self.bus.update(|state| state.catalog = CatalogStatus::Loading);

        match self.api.fetch_products().await {
            Ok(products) => {
                let count = products.len();
                let applied = self.bus.update_if(|state| {
                    if !self.generation.is_current(ticket) {
                        return false;
                    }
                    state.products = products;
                    state.catalog = CatalogStatus::Ready;
                    true
                });
                if !applied {
                    debug!("discarding stale catalog response");
                    return Err(CatalogError::Superseded);
                }
                info!(count, "catalog loaded");
                Ok(count)
            }
            Err(e) => {
                let message = format!("Could not load products: {e}");
                let applied = self.bus.update_if(|state| {
                    if !self.generation.is_current(ticket) {
                        return false;
                    }
                    state.catalog = CatalogStatus::Error(message);
                    true
                });
                if !applied {
                    return Err(CatalogError::Superseded);
                }
                warn!(error = %e, "catalog load failed");
                Err(CatalogError::Load(e))
            }
        }
    }

    /// User-initiated retry of [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub async fn reload(&self) -> Result<usize, CatalogError> {
        add_breadcrumb("catalog", "Reload requested", None);
        self.load().await
    }

    /// Append a product that the backend has already stored, then run
    /// `on_complete`.
    ///
    /// Ids are not deduplicated; a collision is only logged.
    pub fn add_product(&self, product: Product, on_complete: impl FnOnce(&Product)) {
        self.bus.update(|state| {
            if state.product(&product.id).is_some() {
                warn!(product_id = %product.id, "product id already in catalog");
            }
            state.products.push(product.clone());
        });
        on_complete(&product);
    }

    /// Create a product remotely, then append it locally.
    ///
    /// The signed-in user's token is attached when there is one. The list is
    /// unchanged and `on_complete` is not called if the backend refuses.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Create` if the remote call fails.
    #[instrument(skip(self, product, on_complete), fields(product_id = %product.id))]
    pub async fn create_product(
        &self,
        product: Product,
        on_complete: impl FnOnce(&Product) + Send,
    ) -> Result<Product, CatalogError> {
        let token = self.bus.snapshot().user.as_ref().map(|u| u.token.clone());

        let stored = self
            .api
            .create_product(&product, token.as_ref())
            .await
            .map_err(CatalogError::Create)?;

        info!(name = %stored.name, "product created");
        self.add_product(stored.clone(), on_complete);
        Ok(stored)
    }

    /// Products currently in the catalog.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.bus.snapshot().products.clone()
    }
}
