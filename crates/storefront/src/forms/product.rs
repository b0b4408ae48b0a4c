//! Add Product form.

use tracing::{instrument, warn};

use ny_pizza_core::{Price, ProductId};

use super::{Flash, required};
use crate::api::CatalogApi;
use crate::error::{StorefrontError, ValidationError};
use crate::models::Product;
use crate::stores::CatalogStore;

const MISSING_FIELDS: &str = "Please enter name and price";
const CREATED: &str = "Product created successfully";

/// Field values of the Add Product form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    /// Optional; blank means 0.
    pub stock: String,
    pub short_desc: String,
    pub description: String,
    /// Result of the last submission.
    pub flash: Option<Flash>,
}

impl ProductForm {
    /// Build a product from the fields, with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if name or price is blank, if price is not a
    /// non-negative decimal, or if stock is not a whole number.
    pub fn validate(&self) -> Result<Product, ValidationError> {
        let name = required(&self.name, "name")?;
        let price = required(&self.price, "price")?;
        let price = Price::parse(price).map_err(|e| ValidationError::Invalid {
            field: "price",
            reason: e.to_string(),
        })?;

        let stock = match self.stock.trim() {
            "" => 0,
            raw => raw.parse::<u32>().map_err(|e| ValidationError::Invalid {
                field: "stock",
                reason: e.to_string(),
            })?,
        };

        let mut product = Product::new(ProductId::generate(), name, price);
        product.stock = stock;
        product.short_desc = self.short_desc.trim().to_string();
        product.description = self.description.trim().to_string();
        Ok(product)
    }

    /// Validate, create the product remotely, then append it to the catalog.
    ///
    /// On success the fields are reset and a success flash is set. On failure
    /// the fields are kept and a danger flash is set.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Validation` (no network call made) or
    /// `StorefrontError::Catalog` if the backend refused.
    #[instrument(skip_all)]
    pub async fn submit<C: CatalogApi>(
        &mut self,
        catalog: &CatalogStore<C>,
    ) -> Result<Product, StorefrontError> {
        let product = match self.validate() {
            Ok(product) => product,
            Err(e) => {
                self.flash = Some(match e {
                    ValidationError::Required(_)
                    | ValidationError::Invalid { field: "price", .. } => {
                        Flash::danger(MISSING_FIELDS)
                    }
                    ValidationError::Invalid { .. } => Flash::danger(e.to_string()),
                });
                return Err(e.into());
            }
        };

        let created = catalog
            .create_product(product, |_| self.reset_fields())
            .await;

        match created {
            Ok(product) => {
                self.flash = Some(Flash::success(CREATED));
                Ok(product)
            }
            Err(e) => {
                warn!(error = %e, "product creation failed");
                self.flash = Some(Flash::danger("Could not create product, please retry"));
                Err(e.into())
            }
        }
    }

    fn reset_fields(&mut self) {
        *self = Self {
            flash: self.flash.take(),
            ..Self::default()
        };
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::forms::FlashLevel;
    use crate::stores::fake::{FakeBackend, harness};

    fn form(name: &str, price: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            price: price.to_string(),
            ..ProductForm::default()
        }
    }

    fn catalog(backend: &Arc<FakeBackend>) -> CatalogStore<FakeBackend> {
        let (bus, _, _) = harness();
        CatalogStore::new(Arc::clone(backend), bus)
    }

    #[test]
    fn test_validate_builds_product() {
        let mut input = form(" Pizza ", "10");
        input.stock = "4".to_string();
        input.short_desc = "Cheesy".to_string();

        let product = input.validate().unwrap();
        assert_eq!(product.name, "Pizza");
        assert_eq!(product.price.to_string(), "$10.00");
        assert_eq!(product.stock, 4);
        assert_eq!(product.short_desc, "Cheesy");
        assert!(!product.id.as_str().is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        assert_eq!(
            form("", "10").validate(),
            Err(ValidationError::Required("name"))
        );
        assert_eq!(
            form("Pizza", "  ").validate(),
            Err(ValidationError::Required("price"))
        );
        assert!(matches!(
            form("Pizza", "ten").validate(),
            Err(ValidationError::Invalid { field: "price", .. })
        ));

        let mut input = form("Pizza", "10");
        input.stock = "-1".to_string();
        assert!(matches!(
            input.validate(),
            Err(ValidationError::Invalid { field: "stock", .. })
        ));
    }

    #[tokio::test]
    async fn test_submit_success_resets_fields() {
        let backend = Arc::new(FakeBackend::default());
        let catalog = catalog(&backend);
        let mut input = form("Pizza", "10");

        let product = input.submit(&catalog).await.unwrap();

        assert_eq!(product.name, "Pizza");
        assert_eq!(catalog.products().len(), 1);
        assert!(input.name.is_empty());
        assert!(input.price.is_empty());
        assert_eq!(input.flash, Some(Flash::success(CREATED)));
    }

    #[tokio::test]
    async fn test_submit_blank_makes_no_call() {
        let backend = Arc::new(FakeBackend::default());
        let catalog = catalog(&backend);
        let mut input = form("", "");

        let err = input.submit(&catalog).await.unwrap_err();

        assert!(matches!(err, StorefrontError::Validation(_)));
        assert_eq!(input.flash, Some(Flash::danger(MISSING_FIELDS)));
        assert_eq!(backend.calls(), 0);
        assert!(catalog.products().is_empty());
    }

    #[tokio::test]
    async fn test_submit_remote_failure_keeps_fields() {
        let backend = Arc::new(FakeBackend::default());
        backend.fail_create.store(true, Ordering::SeqCst);
        let catalog = catalog(&backend);
        let mut input = form("Pizza", "10");

        assert!(input.submit(&catalog).await.is_err());

        assert_eq!(input.name, "Pizza");
        assert_eq!(input.flash.as_ref().unwrap().level, FlashLevel::Danger);
        assert!(catalog.products().is_empty());
    }
}
