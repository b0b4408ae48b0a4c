//! The root handle wiring the stores to one bus.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, instrument};

use ny_pizza_core::{Email, ProductId};

use crate::api::{ApiClient, AuthApi, CatalogApi, OrderService, Receipt};
use crate::bus::{StateBus, Subscriber, SubscriberId};
use crate::config::StorefrontConfig;
use crate::error::{Result, StorefrontError};
use crate::models::{Product, User};
use crate::nav::NavBar;
use crate::persistence::Persistence;
use crate::state::{AppState, CatalogStatus};
use crate::storage::{FileStore, KeyValueStore};
use crate::stores::{
    AuthError, CartStore, CatalogError, CatalogStore, CheckoutError, SessionStore,
};

/// Shared state plus its mutators.
///
/// Cheap to clone; hand a clone to every component at construction time.
pub struct Storefront<B = ApiClient> {
    inner: Arc<StorefrontInner<B>>,
}

struct StorefrontInner<B> {
    bus: StateBus,
    session: SessionStore<B>,
    catalog: CatalogStore<B>,
    cart: CartStore<B>,
}

impl<B> Clone for Storefront<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Storefront<ApiClient> {
    /// Build a storefront talking HTTP to the configured backend and
    /// persisting to the configured data directory.
    ///
    /// Persisted state is hydrated immediately; call [`start`](Self::start)
    /// to fetch the catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Api` if the HTTP client cannot be built.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self> {
        let client = ApiClient::new(&config.api)?;
        let files = FileStore::new(&config.data_dir);
        info!(
            api_url = %client.base_url(),
            data_dir = %files.dir().display(),
            "storefront configured"
        );
        let store: Arc<dyn KeyValueStore> = Arc::new(files);
        Ok(Self::new(Arc::new(client), store, config.admin_email.clone()))
    }
}

impl<B> Storefront<B>
where
    B: AuthApi + CatalogApi + OrderService,
{
    /// Wire the stores over `backend`, hydrating user and cart from `store`.
    ///
    /// No network call is made.
    #[must_use]
    pub fn new(backend: Arc<B>, store: Arc<dyn KeyValueStore>, admin_email: Email) -> Self {
        let persistence = Persistence::new(store);
        let hydrated = persistence.hydrate();

        let bus = StateBus::new(AppState {
            user: hydrated.user,
            cart: hydrated.cart,
            ..AppState::default()
        });

        Self {
            inner: Arc::new(StorefrontInner {
                session: SessionStore::new(
                    Arc::clone(&backend),
                    bus.clone(),
                    persistence.clone(),
                    admin_email,
                ),
                catalog: CatalogStore::new(Arc::clone(&backend), bus.clone()),
                cart: CartStore::new(backend, bus.clone(), persistence),
                bus,
            }),
        }
    }

    /// Startup fetch of the catalog.
    ///
    /// Never fails: a fetch error becomes [`CatalogStatus::Error`] in state.
    #[instrument(skip(self))]
    pub async fn start(&self) -> CatalogStatus {
        // Outcome is already published; the error was logged by the store
        let _ = self.inner.catalog.load().await;
        let status = self.snapshot().catalog.clone();
        info!(?status, "storefront started");
        status
    }

    // =========================================================================
    // State access
    // =========================================================================

    /// The bus shared by every store.
    #[must_use]
    pub fn bus(&self) -> &StateBus {
        &self.inner.bus
    }

    /// Latest published state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AppState> {
        self.inner.bus.snapshot()
    }

    /// Register a subscriber; it receives the current state immediately.
    pub fn subscribe(&self, subscriber: impl Subscriber + 'static) -> SubscriberId {
        self.inner.bus.subscribe(subscriber)
    }

    /// Remove a subscriber.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.inner.bus.unsubscribe(id)
    }

    /// Async receiver of the latest state.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Arc<AppState>> {
        self.inner.bus.watch()
    }

    /// Navigation bar for the current state.
    #[must_use]
    pub fn nav(&self) -> NavBar {
        NavBar::from(&*self.snapshot())
    }

    /// The session store, for forms and callers that need it directly.
    #[must_use]
    pub fn session(&self) -> &SessionStore<B> {
        &self.inner.session
    }

    /// The catalog store.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore<B> {
        &self.inner.catalog
    }

    /// The cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore<B> {
        &self.inner.cart
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// See [`SessionStore::login`].
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.inner.session.login(email, password).await
    }

    /// See [`SessionStore::try_login`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the login failed or was superseded.
    pub async fn try_login(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<User, AuthError> {
        self.inner.session.try_login(email, password).await
    }

    /// See [`SessionStore::logout`].
    pub fn logout(&self) {
        self.inner.session.logout();
    }

    /// See [`CatalogStore::reload`].
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the fetch failed.
    pub async fn reload(&self) -> std::result::Result<usize, CatalogError> {
        self.inner.catalog.reload().await
    }

    /// See [`CatalogStore::add_product`].
    pub fn add_product(&self, product: Product, on_complete: impl FnOnce(&Product)) {
        self.inner.catalog.add_product(product, on_complete);
    }

    /// See [`CatalogStore::create_product`].
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Create` if the backend refused.
    pub async fn create_product(
        &self,
        product: Product,
        on_complete: impl FnOnce(&Product) + Send,
    ) -> std::result::Result<Product, CatalogError> {
        self.inner.catalog.create_product(product, on_complete).await
    }

    /// See [`CartStore::add_to_cart`].
    pub fn add_to_cart(&self, product: &Product) -> u32 {
        self.inner.cart.add_to_cart(product)
    }

    /// Add a catalog product to the cart by id.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotFound` if the id is not in the catalog.
    pub fn add_to_cart_by_id(&self, id: &ProductId) -> Result<u32> {
        let state = self.snapshot();
        let product = state
            .product(id)
            .ok_or_else(|| StorefrontError::NotFound(format!("product {id}")))?;
        Ok(self.inner.cart.add_to_cart(product))
    }

    /// See [`CartStore::remove_from_cart`].
    pub fn remove_from_cart(&self, id: &ProductId) -> Option<u32> {
        self.inner.cart.remove_from_cart(id)
    }

    /// See [`CartStore::clear_cart`].
    pub fn clear_cart(&self) {
        self.inner.cart.clear_cart();
    }

    /// See [`CartStore::checkout`].
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if checkout was refused or failed.
    pub async fn checkout(&self) -> std::result::Result<Receipt, CheckoutError> {
        self.inner.cart.checkout().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::Ordering;

    use ny_pizza_core::AccessLevel;

    use super::*;
    use crate::models::storage_keys;
    use crate::storage::MemoryStore;
    use crate::stores::fake::{FakeBackend, pizza};

    fn storefront(
        backend: &Arc<FakeBackend>,
        values: &[(&str, &str)],
    ) -> Storefront<FakeBackend> {
        let store = Arc::new(MemoryStore::with_values(values.iter().copied()));
        Storefront::new(
            Arc::clone(backend),
            store,
            Email::parse("admin@example.com").unwrap(),
        )
    }

    #[test]
    fn test_hydrates_user_without_network() {
        let backend = Arc::new(FakeBackend::default());
        let app = storefront(
            &backend,
            &[(
                storage_keys::USER,
                r#"{"email":"a@b.com","token":"t","accessLevel":1}"#,
            )],
        );

        let user = app.snapshot().user.clone().unwrap();
        assert_eq!(user.email.as_str(), "a@b.com");
        assert_eq!(user.token.expose(), "t");
        assert_eq!(user.access_level, AccessLevel::Regular);
        assert_eq!(backend.calls(), 0);
    }

    #[test]
    fn test_corrupt_cart_hydrates_empty() {
        let backend = Arc::new(FakeBackend::default());
        let app = storefront(&backend, &[(storage_keys::CART, "not json")]);

        assert!(app.snapshot().cart.is_empty());
        assert_eq!(app.snapshot().catalog, CatalogStatus::Loading);
    }

    #[tokio::test]
    async fn test_start_survives_catalog_failure() {
        let backend = Arc::new(FakeBackend::with_products(vec![pizza("p1", "10")]));
        backend.fail_catalog.store(true, Ordering::SeqCst);
        let app = storefront(&backend, &[]);

        assert!(matches!(app.start().await, CatalogStatus::Error(_)));

        backend.fail_catalog.store(false, Ordering::SeqCst);
        assert_eq!(app.reload().await.unwrap(), 1);
        assert_eq!(app.start().await, CatalogStatus::Ready);
    }

    #[tokio::test]
    async fn test_add_to_cart_by_id() {
        let backend = Arc::new(FakeBackend::with_products(vec![pizza("p1", "10")]));
        let app = storefront(&backend, &[]);
        app.start().await;

        assert_eq!(app.add_to_cart_by_id(&ProductId::new("p1")).unwrap(), 1);
        assert!(matches!(
            app.add_to_cart_by_id(&ProductId::new("nope")),
            Err(StorefrontError::NotFound(_))
        ));
        assert_eq!(app.nav().cart_badge, 1);
    }

    #[tokio::test]
    async fn test_mutations_reach_every_subscriber() {
        let backend = Arc::new(FakeBackend::with_products(vec![pizza("p1", "10")]));
        let app = storefront(&backend, &[]);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        app.subscribe(move |state: &AppState| {
            let _ = tx.send(state.cart.badge_count());
        });

        app.start().await;
        app.add_to_cart(&pizza("p1", "10"));
        app.clear_cart();

        let mut badges = Vec::new();
        while let Ok(badge) = rx.try_recv() {
            badges.push(badge);
        }
        // initial, Loading, Ready, add, clear
        assert_eq!(badges, vec![0, 0, 0, 1, 0]);
    }
}
