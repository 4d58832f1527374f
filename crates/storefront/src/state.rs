//! Application state shared by every view.
//!
//! Constructed once at startup and passed around by handle. Views read
//! snapshots through the getters and dispatch intents through the mutating
//! methods; each mutation is persisted before it returns.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use shopfront_core::ProductId;

use crate::api::{ApiError, CatalogClient, CatalogItem, Credentials, UserProfile};
use crate::cart::{CartLine, CartStore, ReconciledCart};
use crate::catalog::{CatalogCache, RefreshOutcome};
use crate::checkout::Checkout;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::orders::{OrderHistory, OrderRecord};
use crate::session::Session;
use crate::storage::{LocalStorage, keys};
use crate::wishlist::{WishlistEntry, WishlistStore};

/// Application state shared across all views.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    client: CatalogClient,
    catalog: CatalogCache<CatalogClient>,
    storage: LocalStorage,
    cart: RwLock<CartStore>,
    wishlist: RwLock<WishlistStore>,
    session: RwLock<Session>,
    orders: RwLock<OrderHistory>,
    // Serializes mutate-then-save so documents are written in mutation order.
    writes: Mutex<()>,
}

impl AppState {
    /// Build the client and load persisted cart, wishlist, orders and user.
    ///
    /// The catalog starts empty; call [`Self::refresh_catalog`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub async fn load(config: StorefrontConfig) -> Result<Self, AppError> {
        let client = CatalogClient::new(&config.api)?;
        let catalog = CatalogCache::new(client.clone());
        let storage = LocalStorage::new(config.data_dir.clone());

        let cart: CartStore = storage.load_entries::<CartLine, _>(keys::CART).await;
        let wishlist: WishlistStore = storage
            .load_entries::<WishlistEntry, _>(keys::WISHLIST)
            .await;
        let orders: OrderHistory = storage.load_entries::<OrderRecord, _>(keys::ORDERS).await;
        let session: Session = storage.load(keys::USER).await;

        info!(
            data_dir = %storage.dir().display(),
            cart_lines = cart.len(),
            wishlist = wishlist.len(),
            orders = orders.len(),
            signed_in = session.is_authenticated(),
            "Loaded local state"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                catalog,
                storage,
                cart: RwLock::new(cart),
                wishlist: RwLock::new(wishlist),
                session: RwLock::new(session),
                orders: RwLock::new(orders),
                writes: Mutex::new(()),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Direct access to the remote service.
    #[must_use]
    pub fn client(&self) -> &CatalogClient {
        &self.inner.client
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogCache<CatalogClient> {
        &self.inner.catalog
    }

    #[must_use]
    pub fn storage(&self) -> &LocalStorage {
        &self.inner.storage
    }

    pub async fn refresh_catalog(&self) -> RefreshOutcome {
        self.inner.catalog.refresh().await
    }

    fn catalog_item(&self, id: ProductId) -> Result<CatalogItem, AppError> {
        self.inner
            .catalog
            .find_by_id(id)
            .ok_or(AppError::NotInCatalog(id))
    }

    async fn persist<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        self.inner.storage.save(key, value).await?;
        Ok(())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// The stored cart, dangling lines included.
    #[must_use]
    pub fn cart(&self) -> CartStore {
        self.inner.cart.read().clone()
    }

    /// The cart against the current catalog snapshot.
    #[must_use]
    pub fn reconciled_cart(&self) -> ReconciledCart {
        let snapshot = self.inner.catalog.snapshot();
        self.inner.cart.read().reconcile(&snapshot)
    }

    /// Add a product from the current catalog snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotInCatalog` if the id is not in the snapshot, a cart error
    /// if the add is rejected, or a storage error if saving fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn add_to_cart(&self, id: ProductId, quantity: u32) -> Result<u32, AppError> {
        let item = self.catalog_item(id)?;
        let _guard = self.inner.writes.lock().await;
        let (total, cart) = {
            let mut cart = self.inner.cart.write();
            let total = cart.add(&item, quantity)?;
            (total, cart.clone())
        };
        self.persist(keys::CART, &cart).await?;
        Ok(total)
    }

    /// # Errors
    ///
    /// Returns a cart error on overflow or a storage error if saving fails.
    pub async fn set_quantity(&self, id: ProductId, quantity: i64) -> Result<bool, AppError> {
        self.mutate_cart(|cart| Ok(cart.set_quantity(id, quantity)?)).await
    }

    /// # Errors
    ///
    /// Returns a cart error on overflow or a storage error if saving fails.
    pub async fn increment(&self, id: ProductId) -> Result<bool, AppError> {
        self.mutate_cart(|cart| Ok(cart.increment(id)?)).await
    }

    /// # Errors
    ///
    /// Returns a storage error if saving fails.
    pub async fn decrement(&self, id: ProductId) -> Result<bool, AppError> {
        self.mutate_cart(|cart| Ok(cart.decrement(id))).await
    }

    /// # Errors
    ///
    /// Returns a storage error if saving fails.
    pub async fn remove_from_cart(&self, id: ProductId) -> Result<bool, AppError> {
        self.mutate_cart(|cart| Ok(cart.remove(id))).await
    }

    /// # Errors
    ///
    /// Returns a storage error if saving fails.
    pub async fn clear_cart(&self) -> Result<(), AppError> {
        self.mutate_cart(|cart| {
            cart.clear();
            Ok(())
        })
        .await
    }

    async fn mutate_cart<R>(
        &self,
        f: impl FnOnce(&mut CartStore) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let _guard = self.inner.writes.lock().await;
        let (result, cart) = {
            let mut cart = self.inner.cart.write();
            let result = f(&mut cart)?;
            (result, cart.clone())
        };
        self.persist(keys::CART, &cart).await?;
        Ok(result)
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    #[must_use]
    pub fn wishlist(&self) -> WishlistStore {
        self.inner.wishlist.read().clone()
    }

    /// Save a product from the current catalog snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotInCatalog` or a storage error.
    pub async fn wishlist_add(&self, id: ProductId) -> Result<bool, AppError> {
        let item = self.catalog_item(id)?;
        self.mutate_wishlist(|wishlist| Ok(wishlist.add(&item))).await
    }

    /// # Errors
    ///
    /// Returns a storage error if saving fails.
    pub async fn wishlist_remove(&self, id: ProductId) -> Result<bool, AppError> {
        self.mutate_wishlist(|wishlist| Ok(wishlist.remove(id))).await
    }

    /// # Errors
    ///
    /// Returns a storage error if saving fails.
    pub async fn wishlist_clear(&self) -> Result<(), AppError> {
        self.mutate_wishlist(|wishlist| {
            wishlist.clear();
            Ok(())
        })
        .await
    }

    async fn mutate_wishlist<R>(
        &self,
        f: impl FnOnce(&mut WishlistStore) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let _guard = self.inner.writes.lock().await;
        let (result, wishlist) = {
            let mut wishlist = self.inner.wishlist.write();
            let result = f(&mut wishlist)?;
            (result, wishlist.clone())
        };
        self.persist(keys::WISHLIST, &wishlist).await?;
        Ok(result)
    }

    /// Move a saved product into the cart.
    ///
    /// Uses the current catalog record when the product is in the snapshot,
    /// the saved one otherwise. If the cart refuses, nothing changes.
    ///
    /// # Errors
    ///
    /// Returns a wishlist error (missing entry or cart refusal) or a storage
    /// error.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn move_to_cart(&self, id: ProductId) -> Result<u32, AppError> {
        let current = self.inner.catalog.find_by_id(id);
        let _guard = self.inner.writes.lock().await;
        let (quantity, cart, wishlist) = {
            let mut wishlist = self.inner.wishlist.write();
            let mut cart = self.inner.cart.write();
            let quantity = match &current {
                Some(item) => wishlist.move_with(id, &mut cart, item)?,
                None => wishlist.move_to_cart(id, &mut cart)?,
            };
            (quantity, cart.clone(), wishlist.clone())
        };
        self.persist(keys::CART, &cart).await?;
        self.persist(keys::WISHLIST, &wishlist).await?;
        Ok(quantity)
    }

    // =========================================================================
    // Session
    // =========================================================================

    #[must_use]
    pub fn session(&self) -> Session {
        self.inner.session.read().clone()
    }

    /// Customer login; remembers the profile on success.
    ///
    /// # Errors
    ///
    /// Returns the service error on bad credentials, or a storage error.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile, AppError> {
        let profile = self.inner.client.login(credentials).await?;
        self.remember(profile).await
    }

    /// Administrator login; remembers the profile on success.
    ///
    /// # Errors
    ///
    /// Returns the service error (403 for non-admins), or a storage error.
    pub async fn admin_login(&self, credentials: &Credentials) -> Result<UserProfile, AppError> {
        let profile = self.inner.client.admin_login(credentials).await?;
        self.remember(profile).await
    }

    async fn remember(&self, profile: UserProfile) -> Result<UserProfile, AppError> {
        let _guard = self.inner.writes.lock().await;
        let session = {
            let mut session = self.inner.session.write();
            session.login(profile.clone());
            session.clone()
        };
        self.persist(keys::USER, &session).await?;
        info!(user_id = %profile.id, admin = profile.role.is_admin(), "Signed in");
        Ok(profile)
    }

    /// Forget the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the stored profile cannot be deleted.
    pub async fn logout(&self) -> Result<Option<UserProfile>, AppError> {
        let _guard = self.inner.writes.lock().await;
        let previous = self.inner.session.write().logout();
        self.inner.storage.remove(keys::USER).await?;
        Ok(previous)
    }

    // =========================================================================
    // Checkout and orders
    // =========================================================================

    #[must_use]
    pub fn orders(&self) -> OrderHistory {
        self.inner.orders.read().clone()
    }

    /// Ask the service for the current status of every stored order.
    ///
    /// Orders the service no longer knows keep their stored status. Returns
    /// how many statuses changed.
    ///
    /// # Errors
    ///
    /// Returns the service error if any lookup fails (nothing is updated),
    /// or a storage error if saving fails.
    #[instrument(skip(self))]
    pub async fn refresh_orders(&self) -> Result<usize, AppError> {
        let numbers: Vec<String> = self
            .inner
            .orders
            .read()
            .all()
            .iter()
            .map(|o| o.order_number.clone())
            .collect();

        let mut latest = Vec::with_capacity(numbers.len());
        for number in numbers {
            match self.inner.client.get_order(&number).await {
                Ok(placed) => latest.push((number, placed.status)),
                Err(ApiError::NotFound(_)) => {
                    warn!(order_number = %number, "Order unknown to the service, keeping stored status");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let _guard = self.inner.writes.lock().await;
        let (changed, orders) = {
            let mut orders = self.inner.orders.write();
            let mut changed = 0;
            for (number, status) in &latest {
                if orders.update_status(number, *status) {
                    changed += 1;
                }
            }
            (changed, orders.clone())
        };
        if changed > 0 {
            self.persist(keys::ORDERS, &orders).await?;
        }
        info!(changed, "Refreshed order statuses");
        Ok(changed)
    }

    /// Start checkout over the cart as reconciled right now.
    ///
    /// # Errors
    ///
    /// Returns a checkout error if the cart is empty or holds unavailable
    /// products.
    pub fn begin_checkout(&self) -> Result<Checkout, AppError> {
        Ok(Checkout::review(
            self.reconciled_cart(),
            &self.inner.config.pricing,
        )?)
    }

    /// Submit a checkout that has its details filled in.
    ///
    /// Only when the service accepts the order is it appended to history and
    /// is the ordered quantity taken off each cart line. Units added while
    /// the order was in flight and dangling lines stay.
    ///
    /// # Errors
    ///
    /// Returns a checkout error if submission fails (nothing is committed),
    /// or a storage error if saving the committed state fails.
    #[instrument(skip(self, checkout))]
    pub async fn submit_checkout(&self, checkout: &mut Checkout) -> Result<OrderRecord, AppError> {
        let record = checkout
            .submit(&self.inner.client, self.inner.config.payment_delay)
            .await?;

        let _guard = self.inner.writes.lock().await;
        let (cart, orders) = {
            let mut cart = self.inner.cart.write();
            for line in &checkout.cart().lines {
                cart.deduct(line.item_id, line.quantity);
            }
            let mut orders = self.inner.orders.write();
            orders.append(record.clone());
            (cart.clone(), orders.clone())
        };
        self.persist(keys::ORDERS, &orders).await?;
        self.persist(keys::CART, &cart).await?;
        Ok(record)
    }
}
