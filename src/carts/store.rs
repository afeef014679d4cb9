//! Cart store.
//!
//! Single shared source of truth for the current user's cart, synchronized
//! with the backend. Constructed once at application start and handed by
//! reference to every consumer (cart page, cart icon, add-to-cart button);
//! all of them read the same snapshot.
//!
//! Synchronization model: every successful response replaces `items` and
//! `summary` wholesale with the server's returned truth. Mutations are
//! serialized through an internal queue, and each request carries a
//! monotonically increasing ticket; a response whose ticket is older than
//! the newest applied one is discarded, so the last *issued* request wins
//! rather than the last one to resolve.

use std::sync::{
    Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    api::ApiError,
    auth::credentials::CredentialStore,
    carts::{
        api::CartApi,
        errors::CartError,
        models::{CartPayload, CartState, clamp_quantity},
    },
};

const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to manage your cart";

/// Shared client-side mirror of the server-owned cart.
pub struct CartStore {
    api: Arc<dyn CartApi>,
    credentials: Arc<dyn CredentialStore>,
    state: RwLock<CartState>,

    /// Serializes mutating operations against the one cart.
    mutations: Mutex<()>,

    /// Ticket counter for issued requests.
    issued: AtomicU64,

    /// Ticket of the newest response applied to `state`.
    applied: AtomicU64,

    /// Number of requests currently in flight; `loading` mirrors it.
    in_flight: AtomicU64,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.read_state().clone())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    #[must_use]
    pub fn new(api: Arc<dyn CartApi>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            api,
            credentials,
            state: RwLock::new(CartState::empty()),
            mutations: Mutex::new(()),
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            in_flight: AtomicU64::new(0),
        }
    }

    /// A snapshot of the current state for rendering.
    #[must_use]
    pub fn state(&self) -> CartState {
        self.read_state().clone()
    }

    /// Refresh the cart from the server.
    ///
    /// With no stored credential this resets to the empty cart without a
    /// network call: logged out is a normal "no cart" state, not a failure.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; state keeps its previous items with
    /// the error message set.
    pub async fn fetch_cart(&self) -> Result<(), CartError> {
        if self.credentials.token().is_none() {
            self.reset();
            return Ok(());
        }

        let ticket = self.begin_request();
        let result = self.api.fetch_cart().await;
        self.end_request();

        match result {
            Ok(payload) => {
                self.adopt(ticket, payload);
                Ok(())
            }
            Err(error) => {
                self.fail("Failed to load cart", &error);
                Err(error.into())
            }
        }
    }

    /// Add `quantity` units of a product. The quantity is clamped into the
    /// orderable range before the request is sent.
    ///
    /// # Errors
    ///
    /// [`CartError::Unauthenticated`] without a credential (no network call
    /// is made); otherwise the classified API failure.
    pub async fn add_to_cart(&self, product_id: u64, quantity: u32) -> Result<(), CartError> {
        let quantity = clamp_quantity(quantity);

        let _serialized = self.mutations.lock().await;

        self.require_credential()?;

        let ticket = self.begin_request();
        let result = self.api.add_item(product_id, quantity).await;
        self.end_request();

        match result {
            Ok(payload) => {
                self.adopt(ticket, payload);
                Ok(())
            }
            Err(error) => {
                self.fail("Failed to add item to cart", &error);
                Err(error.into())
            }
        }
    }

    /// Change a line's quantity, clamped into the orderable range.
    ///
    /// # Errors
    ///
    /// [`CartError::Unauthenticated`] without a credential; otherwise the
    /// classified API failure, leaving the prior quantity displayed.
    pub async fn update_cart_item(&self, item_id: u64, quantity: u32) -> Result<(), CartError> {
        let quantity = clamp_quantity(quantity);

        let _serialized = self.mutations.lock().await;

        self.require_credential()?;

        let ticket = self.begin_request();
        let result = self.api.update_item(item_id, quantity).await;
        self.end_request();

        match result {
            Ok(payload) => {
                self.adopt(ticket, payload);
                Ok(())
            }
            Err(error) => {
                self.fail("Failed to update cart item", &error);
                Err(error.into())
            }
        }
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// [`CartError::Unauthenticated`] without a credential; otherwise the
    /// classified API failure.
    pub async fn remove_from_cart(&self, item_id: u64) -> Result<(), CartError> {
        let _serialized = self.mutations.lock().await;

        self.require_credential()?;

        let ticket = self.begin_request();
        let result = self.api.remove_item(item_id).await;
        self.end_request();

        match result {
            Ok(payload) => {
                self.adopt(ticket, payload);
                Ok(())
            }
            Err(error) => {
                self.fail("Failed to remove item from cart", &error);
                Err(error.into())
            }
        }
    }

    /// Empty the cart. Idempotent: clearing an already-empty cart succeeds.
    ///
    /// # Errors
    ///
    /// [`CartError::Unauthenticated`] without a credential; otherwise the
    /// classified API failure.
    pub async fn clear_cart(&self) -> Result<(), CartError> {
        let _serialized = self.mutations.lock().await;

        self.require_credential()?;

        let ticket = self.begin_request();
        let result = self.api.clear().await;
        self.end_request();

        match result {
            Ok(payload) => {
                self.adopt(ticket, payload);
                Ok(())
            }
            Err(error) => {
                self.fail("Failed to clear cart", &error);
                Err(error.into())
            }
        }
    }

    /// Total units in the cart, for the badge on the cart icon. Never
    /// fails: logged out or any API failure yields 0.
    pub async fn cart_count(&self) -> u32 {
        if self.credentials.token().is_none() {
            return 0;
        }

        match self.api.count().await {
            Ok(count) => count,
            Err(error) => {
                debug!("cart count unavailable: {error}");
                0
            }
        }
    }

    /// Reset to the empty cart, e.g. on logout. Responses to requests
    /// issued before the reset are discarded when they arrive.
    pub fn reset(&self) {
        self.applied
            .store(self.issued.load(Ordering::SeqCst), Ordering::SeqCst);

        *self.write_state() = CartState::empty();
    }

    fn require_credential(&self) -> Result<(), CartError> {
        if self.credentials.token().is_some() {
            return Ok(());
        }

        self.write_state().error = Some(LOGIN_REQUIRED_MESSAGE.to_string());

        Err(CartError::Unauthenticated)
    }

    fn begin_request(&self) -> u64 {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.write_state().loading = true;

        ticket
    }

    fn end_request(&self) {
        let pending = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;

        if pending == 0 {
            self.write_state().loading = false;
        }
    }

    /// Replace state with a server-returned cart, unless a response from a
    /// later-issued request has already been applied.
    fn adopt(&self, ticket: u64, payload: CartPayload) -> bool {
        let mut applied = self.applied.load(Ordering::SeqCst);

        loop {
            if ticket < applied {
                debug!(ticket, applied, "discarding stale cart response");
                return false;
            }

            match self
                .applied
                .compare_exchange(applied, ticket, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => break,
                Err(current) => applied = current,
            }
        }

        let mut state = self.write_state();
        state.items = payload.items;
        state.summary = payload.summary;
        state.error = None;

        true
    }

    fn fail(&self, fallback: &str, error: &ApiError) {
        self.write_state().error = Some(failure_message(fallback, error));
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CartState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CartState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn failure_message(fallback: &str, error: &ApiError) -> String {
    match error {
        ApiError::Unauthenticated => LOGIN_REQUIRED_MESSAGE.to_string(),
        ApiError::Validation(message) => message.clone(),
        ApiError::NotFound => "Item not found".to_string(),
        ApiError::Forbidden => "You do not have permission to do that".to_string(),
        ApiError::Network(_) => "Network error. Please check your connection".to_string(),
        ApiError::Server(status) => format!("{fallback} (server error {status})"),
        ApiError::UnexpectedResponse(_) => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        auth::credentials::MemoryCredentialStore,
        carts::{
            api::MockCartApi,
            models::{CartItem, CartSummary, ProductSnapshot},
        },
    };

    use super::*;

    fn make_item(item_id: u64, product_id: u64, quantity: u32) -> CartItem {
        CartItem {
            id: item_id,
            product_id,
            quantity,
            unit_price: Decimal::new(10_00, 2),
            product: ProductSnapshot {
                id: product_id,
                title: "Desk Lamp".to_string(),
                price: Decimal::new(10_00, 2),
                discount: None,
                category: None,
                images: Vec::new(),
            },
        }
    }

    fn make_payload(items: Vec<CartItem>, subtotal: Decimal) -> CartPayload {
        let total_items = items.iter().map(|item| item.quantity).sum();

        CartPayload {
            items,
            summary: CartSummary {
                subtotal,
                total_items,
            },
        }
    }

    fn authed_store(api: MockCartApi) -> (CartStore, Arc<MemoryCredentialStore>) {
        let credentials = Arc::new(MemoryCredentialStore::with_token("tok_test"));
        let store = CartStore::new(Arc::new(api), credentials.clone());

        (store, credentials)
    }

    #[tokio::test]
    async fn fetch_without_credential_resets_without_network() -> TestResult {
        let mut api = MockCartApi::new();
        api.expect_fetch_cart().never();

        let store = CartStore::new(Arc::new(api), Arc::new(MemoryCredentialStore::new()));

        store.fetch_cart().await?;

        let state = store.state();
        assert!(state.is_empty(), "expected empty cart");
        assert_eq!(state.error, None);
        assert!(!state.loading, "loading should be false");

        Ok(())
    }

    #[tokio::test]
    async fn unauthenticated_mutations_fail_without_network() {
        let mut api = MockCartApi::new();
        api.expect_add_item().never();
        api.expect_update_item().never();
        api.expect_remove_item().never();
        api.expect_clear().never();

        let store = CartStore::new(Arc::new(api), Arc::new(MemoryCredentialStore::new()));

        let results = [
            store.add_to_cart(42, 1).await,
            store.update_cart_item(11, 2).await,
            store.remove_from_cart(11).await,
            store.clear_cart().await,
        ];

        for result in results {
            assert!(
                matches!(result, Err(CartError::Unauthenticated)),
                "expected Unauthenticated, got {result:?}"
            );
        }

        assert_eq!(
            store.state().error.as_deref(),
            Some(LOGIN_REQUIRED_MESSAGE)
        );
    }

    #[tokio::test]
    async fn add_clamps_oversized_quantity() -> TestResult {
        let mut api = MockCartApi::new();
        api.expect_add_item()
            .once()
            .withf(|product_id, quantity| *product_id == 42 && *quantity == 99)
            .returning(|_, _| Ok(CartPayload::default()));

        let (store, _credentials) = authed_store(api);

        store.add_to_cart(42, 250).await?;

        Ok(())
    }

    #[tokio::test]
    async fn add_raises_zero_quantity_to_one() -> TestResult {
        let mut api = MockCartApi::new();
        api.expect_add_item()
            .once()
            .withf(|_, quantity| *quantity == 1)
            .returning(|_, _| Ok(CartPayload::default()));

        let (store, _credentials) = authed_store(api);

        store.add_to_cart(42, 0).await?;

        Ok(())
    }

    #[tokio::test]
    async fn update_clamps_quantity() -> TestResult {
        let mut api = MockCartApi::new();
        api.expect_update_item()
            .once()
            .withf(|item_id, quantity| *item_id == 11 && *quantity == 99)
            .returning(|_, _| Ok(CartPayload::default()));

        let (store, _credentials) = authed_store(api);

        store.update_cart_item(11, 500).await?;

        Ok(())
    }

    #[tokio::test]
    async fn server_summary_is_adopted_not_recomputed() -> TestResult {
        // The payload's subtotal deliberately disagrees with the item math;
        // the client must trust the server's number.
        let payload = make_payload(vec![make_item(11, 42, 2)], Decimal::new(123_45, 2));

        let mut api = MockCartApi::new();
        api.expect_add_item()
            .once()
            .returning(move |_, _| Ok(payload.clone()));

        let (store, _credentials) = authed_store(api);

        store.add_to_cart(42, 2).await?;

        assert_eq!(store.state().summary.subtotal, Decimal::new(123_45, 2));

        Ok(())
    }

    #[tokio::test]
    async fn clear_twice_is_idempotent() -> TestResult {
        let mut api = MockCartApi::new();
        api.expect_clear()
            .times(2)
            .returning(|| Ok(CartPayload::default()));

        let (store, _credentials) = authed_store(api);

        store.clear_cart().await?;
        store.clear_cart().await?;

        let state = store.state();
        assert!(state.is_empty(), "expected empty cart");
        assert_eq!(state.summary.subtotal, Decimal::ZERO);
        assert_eq!(state.error, None);

        Ok(())
    }

    #[tokio::test]
    async fn removing_last_item_empties_cart() -> TestResult {
        let fetched = make_payload(vec![make_item(11, 42, 1)], Decimal::new(10_00, 2));

        let mut api = MockCartApi::new();
        api.expect_fetch_cart()
            .once()
            .returning(move || Ok(fetched.clone()));
        api.expect_remove_item()
            .once()
            .withf(|item_id| *item_id == 11)
            .returning(|_| Ok(CartPayload::default()));

        let (store, _credentials) = authed_store(api);

        store.fetch_cart().await?;
        assert_eq!(store.state().items.len(), 1);

        store.remove_from_cart(11).await?;

        let state = store.state();
        assert!(state.is_empty(), "expected empty cart");
        assert_eq!(state.summary.total_items, 0);

        Ok(())
    }

    #[tokio::test]
    async fn failed_update_preserves_items_and_sets_error() -> TestResult {
        let fetched = make_payload(vec![make_item(11, 42, 2)], Decimal::new(20_00, 2));

        let mut api = MockCartApi::new();
        api.expect_fetch_cart()
            .once()
            .returning(move || Ok(fetched.clone()));
        api.expect_update_item()
            .once()
            .returning(|_, _| Err(ApiError::NotFound));

        let (store, _credentials) = authed_store(api);

        store.fetch_cart().await?;

        let result = store.update_cart_item(11, 3).await;
        assert!(result.is_err(), "expected update to fail");

        let state = store.state();
        let item = state.items.first().expect("item should survive the failure");

        assert_eq!(item.quantity, 2, "prior quantity should remain displayed");
        assert_eq!(state.error.as_deref(), Some("Item not found"));
        assert!(!state.loading, "loading should clear after failure");

        Ok(())
    }

    #[tokio::test]
    async fn next_success_clears_previous_error() -> TestResult {
        let mut api = MockCartApi::new();
        api.expect_update_item()
            .once()
            .returning(|_, _| Err(ApiError::Server(500)));
        api.expect_fetch_cart()
            .once()
            .returning(|| Ok(CartPayload::default()));

        let (store, _credentials) = authed_store(api);

        let _failed = store.update_cart_item(11, 2).await;
        assert!(store.state().error.is_some(), "expected error to be set");

        store.fetch_cart().await?;
        assert_eq!(store.state().error, None);

        Ok(())
    }

    #[tokio::test]
    async fn validation_message_is_surfaced_verbatim() {
        let mut api = MockCartApi::new();
        api.expect_add_item().once().returning(|_, _| {
            Err(ApiError::Validation(
                "The selected product is invalid.".to_string(),
            ))
        });

        let (store, _credentials) = authed_store(api);

        let result = store.add_to_cart(9999, 1).await;

        assert!(result.is_err(), "expected add to fail");
        assert_eq!(
            store.state().error.as_deref(),
            Some("The selected product is invalid.")
        );
    }

    #[tokio::test]
    async fn count_is_zero_when_logged_out_without_network() {
        let mut api = MockCartApi::new();
        api.expect_count().never();

        let store = CartStore::new(Arc::new(api), Arc::new(MemoryCredentialStore::new()));

        assert_eq!(store.cart_count().await, 0);
    }

    #[tokio::test]
    async fn count_failure_is_silent_zero() {
        let mut api = MockCartApi::new();
        api.expect_count()
            .once()
            .returning(|| Err(ApiError::Server(500)));

        let (store, _credentials) = authed_store(api);

        assert_eq!(store.cart_count().await, 0);
        assert_eq!(store.state().error, None, "count failures stay silent");
    }

    #[tokio::test]
    async fn logout_resets_state() -> TestResult {
        let fetched = make_payload(vec![make_item(11, 42, 2)], Decimal::new(20_00, 2));

        let mut api = MockCartApi::new();
        api.expect_fetch_cart()
            .once()
            .returning(move || Ok(fetched.clone()));

        let (store, credentials) = authed_store(api);

        store.fetch_cart().await?;
        assert_eq!(store.state().items.len(), 1);

        credentials.clear();
        store.fetch_cart().await?;

        assert!(store.state().is_empty(), "expected empty cart after logout");

        Ok(())
    }
}
