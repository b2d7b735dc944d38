//! Catalog view controller.
//!
//! Owns the view state of the products page and every operation that
//! changes it:
//!
//! ```text
//! initialize ──> load_catalog ──> refresh_cart ──> reconcile
//! search_input ──(debounce)──> search ──> display set
//! add_to_cart ──> POST /cart ──> reconcile returned cart
//! ```
//!
//! Failures never escape: each operation notifies the user through the
//! injected [`Notifier`] and leaves the view interactive. Nothing is retried.
//!
//! # Search ordering
//!
//! Every dispatched search takes a sequence number. A response is applied
//! only if no newer search (or clear) was dispatched after it, so a slow
//! response for `"ba"` cannot overwrite the results for `"ball"`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use qkart_core::{
    CartEntry, CartItem, Notification, Product, ProductId, generate_cart_items, is_item_in_cart,
};
use reqwest::StatusCode;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::debounce::Debouncer;
use crate::notify::Notifier;
use crate::qkart::{ApiError, CommerceApi};
use crate::session::{Session, SessionWatch};

/// User-facing notification texts.
pub mod messages {
    pub const PRODUCTS_UNREACHABLE: &str = "Could not fetch products. Check that the backend is running, reachable and returns valid JSON.";
    pub const CART_UNREACHABLE: &str = "Could not fetch cart details. Check that the backend is running, reachable and returns valid JSON.";
    pub const LOGIN_REQUIRED: &str = "Login to add an item to the Cart";
    pub const ALREADY_IN_CART: &str =
        "Item already in cart. Use the cart sidebar to update quantity or remove item.";
}

/// Options for [`CatalogController::add_to_cart`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddToCartOptions {
    /// Reject the request if the product already has a cart line.
    pub prevent_duplicate: bool,
}

/// What [`CatalogController::add_to_cart`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddToCartOutcome {
    /// Server accepted; the cart view was rebuilt from its response.
    Updated,
    /// No session token; nothing was sent.
    LoginRequired,
    /// Duplicate prevention rejected the request; nothing was sent.
    AlreadyInCart,
    /// The request failed; the view is unchanged.
    Failed,
}

/// What [`CatalogController::search`] did to the display set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Display set replaced with this many matches.
    Applied(usize),
    /// 404: display set emptied.
    NoMatches,
    /// Empty query: display set restored to the catalog without a request.
    Cleared,
    /// Server error: display set restored to the catalog.
    ResetToCatalog,
    /// Network or unexpected failure: display set unchanged.
    Failed,
    /// A newer search was dispatched before this one returned; discarded.
    Stale,
}

/// Renderable state of the products page.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    /// Last successfully fetched full catalog.
    pub catalog: Vec<Product>,
    /// Products currently shown (catalog or search results).
    pub display: Vec<Product>,
    /// Cart entries joined with the catalog.
    pub cart: Vec<CartItem>,
    /// Catalog request in flight.
    pub loading: bool,
}

impl CatalogState {
    /// Whether the "no products found" state should be shown.
    ///
    /// Suppressed while the catalog is loading.
    #[must_use]
    pub const fn show_empty_state(&self) -> bool {
        !self.loading && self.display.is_empty()
    }
}

/// Controller for the products page.
///
/// Cheaply cloneable; clones share state. Debounced searches run on spawned
/// tasks holding a clone.
#[derive(Clone)]
pub struct CatalogController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    api: Arc<dyn CommerceApi>,
    notifier: Arc<dyn Notifier>,
    session: SessionWatch,
    state: RwLock<CatalogState>,
    debouncer: Debouncer,
    search_seq: AtomicU64,
    revision: watch::Sender<u64>,
}

impl CatalogController {
    /// Create a controller.
    ///
    /// # Arguments
    ///
    /// * `api` - Backend the controller talks to
    /// * `notifier` - Where user-facing messages go
    /// * `session` - Subscription to the session owned by the `SessionStore`
    /// * `search_debounce` - Quiet period for [`Self::search_input`]
    #[must_use]
    pub fn new(
        api: Arc<dyn CommerceApi>,
        notifier: Arc<dyn Notifier>,
        session: SessionWatch,
        search_debounce: Duration,
    ) -> Self {
        let (revision, _rx) = watch::channel(0);
        Self {
            inner: Arc::new(ControllerInner {
                api,
                notifier,
                session,
                state: RwLock::new(CatalogState::default()),
                debouncer: Debouncer::new(search_debounce),
                search_seq: AtomicU64::new(0),
                revision,
            }),
        }
    }

    /// Snapshot of the current view state.
    pub async fn snapshot(&self) -> CatalogState {
        self.inner.state.read().await.clone()
    }

    /// Current session as last published by the store.
    #[must_use]
    pub fn session(&self) -> Session {
        self.inner.session.borrow().clone()
    }

    /// Subscribe to view changes. The value is a revision counter bumped
    /// after every state mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    fn notify(&self, notification: Notification) {
        self.inner.notifier.notify(notification);
    }

    fn bump_revision(&self) {
        self.inner.revision.send_modify(|rev| *rev += 1);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Mount the page: load the catalog, then the cart, then reconcile.
    ///
    /// The cart is reconciled against the last successfully fetched
    /// catalog, so a failed reload keeps both the products and the cart.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        self.load_catalog().await;
        self.refresh_cart().await;
    }

    /// Spawn a task that reloads the cart whenever the session changes
    /// (login imported, logout). Ends when the session store is dropped.
    #[must_use]
    pub fn watch_session(&self) -> JoinHandle<()> {
        let controller = self.clone();
        let mut session = self.inner.session.clone();

        tokio::spawn(async move {
            while session.changed().await.is_ok() {
                tracing::debug!("Session changed, reloading cart");
                controller.refresh_cart().await;
            }
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the full catalog and make it the display set.
    ///
    /// Returns the catalog on success. On failure the previous state is kept
    /// and the user is notified.
    #[instrument(skip(self))]
    pub async fn load_catalog(&self) -> Option<Vec<Product>> {
        self.inner.state.write().await.loading = true;
        self.bump_revision();

        let result = self.inner.api.get_products().await;

        let mut state = self.inner.state.write().await;
        state.loading = false;
        let catalog = match result {
            Ok(products) => {
                tracing::info!(count = products.len(), "Catalog loaded");
                state.catalog.clone_from(&products);
                state.display.clone_from(&products);
                Some(products)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load catalog");
                let message = e
                    .server_message_for(StatusCode::INTERNAL_SERVER_ERROR)
                    .unwrap_or(messages::PRODUCTS_UNREACHABLE);
                self.notify(Notification::error(message));
                None
            }
        };
        drop(state);
        self.bump_revision();

        catalog
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Search-as-you-type entry point: schedule [`Self::search`] after the
    /// quiet period, superseding any search still waiting.
    ///
    /// Requests already sent are not cancelled; their responses are
    /// discarded if a newer search has been dispatched since.
    pub fn search_input(&self, text: impl Into<String>) -> JoinHandle<()> {
        let controller = self.clone();
        let text = text.into();
        self.inner.debouncer.schedule(async move {
            controller.search(&text).await;
        })
    }

    /// Run a search immediately and apply the result to the display set.
    #[instrument(skip(self))]
    pub async fn search(&self, text: &str) -> SearchOutcome {
        let seq = self.inner.search_seq.fetch_add(1, Ordering::SeqCst) + 1;

        if text.trim().is_empty() {
            let mut state = self.inner.state.write().await;
            state.display = state.catalog.clone();
            drop(state);
            self.bump_revision();
            return SearchOutcome::Cleared;
        }

        let result = self.inner.api.search_products(text).await;
        let outcome = self.apply_search_result(seq, result).await;
        if outcome != SearchOutcome::Stale {
            self.bump_revision();
        }
        outcome
    }

    async fn apply_search_result(
        &self,
        seq: u64,
        result: Result<Vec<Product>, ApiError>,
    ) -> SearchOutcome {
        let mut state = self.inner.state.write().await;

        // Checked under the lock so a newer search cannot apply in between
        if self.inner.search_seq.load(Ordering::SeqCst) != seq {
            tracing::debug!(seq, "Discarding stale search response");
            return SearchOutcome::Stale;
        }

        match result {
            Ok(products) => {
                let count = products.len();
                state.display = products;
                SearchOutcome::Applied(count)
            }
            Err(e) if e.is_not_found() => {
                state.display.clear();
                SearchOutcome::NoMatches
            }
            Err(e) if e.status() == Some(StatusCode::INTERNAL_SERVER_ERROR) => {
                tracing::warn!(error = %e, "Search failed on the server");
                let message = e.server_message().unwrap_or(messages::PRODUCTS_UNREACHABLE);
                self.notify(Notification::error(message));
                state.display = state.catalog.clone();
                SearchOutcome::ResetToCatalog
            }
            Err(e) => {
                tracing::warn!(error = %e, "Search failed");
                self.notify(Notification::error(messages::PRODUCTS_UNREACHABLE));
                SearchOutcome::Failed
            }
        }
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the cart entries of the signed-in user.
    ///
    /// Signed out: empty, no request. Failure: notify, empty for this cycle.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Vec<CartEntry> {
        let Some(token) = self.session().token().cloned() else {
            return Vec::new();
        };

        match self.inner.api.get_cart(&token).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch cart");
                let message = e.server_message().unwrap_or(messages::CART_UNREACHABLE);
                self.notify(Notification::error(message));
                Vec::new()
            }
        }
    }

    /// Re-fetch the cart and rebuild the cart view against the held catalog.
    pub async fn refresh_cart(&self) {
        let entries = self.fetch_cart().await;

        let mut state = self.inner.state.write().await;
        state.cart = generate_cart_items(&entries, &state.catalog);
        drop(state);
        self.bump_revision();
    }

    /// Set the quantity of a product in the cart.
    ///
    /// The server's returned cart replaces the cart view wholesale. Nothing
    /// is applied before the server answers.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        product_id: &ProductId,
        qty: u32,
        options: AddToCartOptions,
    ) -> AddToCartOutcome {
        let Some(token) = self.session().token().cloned() else {
            self.notify(Notification::warning(messages::LOGIN_REQUIRED));
            return AddToCartOutcome::LoginRequired;
        };

        if options.prevent_duplicate
            && is_item_in_cart(&self.inner.state.read().await.cart, product_id)
        {
            self.notify(Notification::warning(messages::ALREADY_IN_CART));
            return AddToCartOutcome::AlreadyInCart;
        }

        match self.inner.api.add_to_cart(&token, product_id, qty).await {
            Ok(entries) => {
                let mut state = self.inner.state.write().await;
                state.cart = generate_cart_items(&entries, &state.catalog);
                drop(state);
                self.bump_revision();
                tracing::info!(qty, "Cart updated");
                AddToCartOutcome::Updated
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to update cart");
                let message = e.server_message().unwrap_or(messages::PRODUCTS_UNREACHABLE);
                self.notify(Notification::error(message));
                AddToCartOutcome::Failed
            }
        }
    }

    /// Cart panel quantity control: [`Self::add_to_cart`] without duplicate
    /// prevention. A quantity of 0 removes the line server-side.
    pub async fn set_quantity(&self, product_id: &ProductId, qty: u32) -> AddToCartOutcome {
        self.add_to_cart(product_id, qty, AddToCartOptions::default())
            .await
    }
}
