//! The cart synchronization store.

use std::sync::{Arc, Mutex};

use url::Url;

use super::checkout::validate_checkout_url;
use crate::commerce::{Cart, CartLineInput, CartLineUpdateInput, CommerceApi, CommerceError};
use crate::db::CartIdRepository;

/// User-facing notification produced by a store operation.
///
/// Every failure path produces exactly one notice; successes produce none,
/// except desync recovery which reports how it resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The remote cart had diverged and was refetched.
    CartRefreshed,
    /// The remote cart was unrecoverable and local state was dropped.
    CartCleared,
    /// The cart could not be synced; the persisted identifier was kept.
    SyncIssue,
    /// The platform rejected the mutation content (e.g. out of stock).
    Validation(String),
    /// Transient network failure after retries were exhausted.
    Network,
    /// Misconfiguration or terminal platform rejection.
    ServiceUnavailable,
    /// The checkout handoff URL was missing or failed validation.
    CheckoutBlocked,
}

impl Notice {
    /// Message shown to the shopper.
    pub fn user_message(&self) -> String {
        match self {
            Notice::CartRefreshed => {
                "Your cart was out of date and has been refreshed".to_string()
            }
            Notice::CartCleared => {
                "Your cart was cleared due to a synchronization issue".to_string()
            }
            Notice::SyncIssue => "We could not sync your cart. Please try again".to_string(),
            Notice::Validation(message) => message.clone(),
            Notice::Network => "Please check your connection and try again".to_string(),
            Notice::ServiceUnavailable => {
                "The store is unavailable right now. Please try again later".to_string()
            }
            Notice::CheckoutBlocked => "Unable to proceed to checkout".to_string(),
        }
    }
}

/// Internal store state. The lock is never held across an await, so two
/// racing mutations both reach the platform and the later complete
/// snapshot wins wholesale.
#[derive(Debug, Default)]
struct State {
    cart: Option<Cart>,
    cart_id: Option<String>,
    loading: bool,
    notice: Option<Notice>,
}

/// Point-in-time view of the store for the UI layer.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    pub cart: Option<Cart>,
    pub cart_id: Option<String>,
    pub loading: bool,
    pub notice: Option<Notice>,
}

/// Single authority for cart state within this process.
///
/// Serializes all mutation intents through itself, persists only the cart
/// identifier across restarts, and recovers from stale-line desync errors
/// by refetching or discarding local state.
pub struct CartStore {
    api: Arc<dyn CommerceApi>,
    ids: CartIdRepository,
    allowed_checkout_hosts: Vec<String>,
    state: Mutex<State>,
}

impl CartStore {
    pub fn new(
        api: Arc<dyn CommerceApi>,
        ids: CartIdRepository,
        allowed_checkout_hosts: Vec<String>,
    ) -> Self {
        Self {
            api,
            ids,
            allowed_checkout_hosts,
            state: Mutex::new(State::default()),
        }
    }

    /// Rehydrate the cart from the persisted identifier, if any.
    ///
    /// A transient failure keeps the identifier (the outage is presumed
    /// temporary); a definitive not-found or data error forgets the cart.
    pub async fn load_cart(&self) {
        let persisted = match self.ids.get().await {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(error = %err, "Failed to read persisted cart identifier");
                None
            }
        };

        let Some(cart_id) = persisted else {
            tracing::debug!("No persisted cart identifier, nothing to load");
            return;
        };

        self.begin();
        {
            let mut state = self.state.lock().unwrap();
            state.cart_id = Some(cart_id.clone());
        }

        match self.api.get_cart(&cart_id).await {
            Ok(Some(cart)) => {
                let cart = cart.sanitize();
                tracing::info!(cart_id = %cart.id, items = cart.item_count(), "Rehydrated cart");
                self.adopt(cart, None);
            }
            Ok(None) => {
                tracing::info!(%cart_id, "Persisted cart no longer exists, starting fresh");
                self.forget_cart(None).await;
            }
            Err(err) if err.is_transient() => {
                tracing::warn!(%cart_id, error = %err, "Cart sync failed, keeping identifier");
                self.fail(Notice::SyncIssue);
            }
            Err(err) => {
                tracing::warn!(%cart_id, error = %err, "Cart is unrecoverable, clearing");
                self.forget_cart(Some(Notice::CartCleared)).await;
            }
        }
    }

    /// Add merchandise to the cart, creating the cart first when none
    /// exists. Returns whether the platform accepted the mutation.
    pub async fn add_to_cart(&self, merchandise_id: &str, quantity: i64) -> bool {
        if merchandise_id.trim().is_empty() || quantity < 1 {
            self.fail(Notice::Validation(
                "A valid item and quantity are required".to_string(),
            ));
            return false;
        }

        let existing = self.current_cart_id();
        self.begin();

        let line = CartLineInput {
            merchandise_id: merchandise_id.to_string(),
            quantity,
        };

        let result = match existing {
            None => match self.api.create_cart(vec![line]).await {
                Ok(cart) => {
                    // The identifier is persisted only on creation; adding to
                    // an existing cart leaves it untouched.
                    if let Err(err) = self.ids.set(&cart.id).await {
                        tracing::warn!(error = %err, "Failed to persist cart identifier");
                    }
                    tracing::info!(cart_id = %cart.id, "Created cart");
                    Ok(cart)
                }
                Err(err) => Err(err),
            },
            Some(cart_id) => self.api.add_lines(&cart_id, vec![line]).await,
        };

        match result {
            Ok(cart) => {
                self.adopt(cart, None);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "Add to cart failed");
                self.fail(Self::notice_for(&err));
                false
            }
        }
    }

    /// Change the quantity of an existing line. No-op without a cart.
    pub async fn update_line(&self, line_id: &str, quantity: i64) -> bool {
        let Some(cart_id) = self.current_cart_id() else {
            tracing::debug!("update_line without a cart is a no-op");
            return false;
        };

        self.begin();
        let result = self
            .api
            .update_lines(
                &cart_id,
                vec![CartLineUpdateInput {
                    id: line_id.to_string(),
                    quantity,
                }],
            )
            .await;

        self.resolve_mutation(&cart_id, result).await
    }

    /// Remove a line from the cart. No-op without a cart.
    pub async fn remove_line(&self, line_id: &str) -> bool {
        let Some(cart_id) = self.current_cart_id() else {
            tracing::debug!("remove_line without a cart is a no-op");
            return false;
        };

        self.begin();
        let result = self.api.remove_lines(&cart_id, vec![line_id.to_string()]).await;

        self.resolve_mutation(&cart_id, result).await
    }

    /// Sum of quantities across all current lines; 0 without a cart.
    /// No I/O, safe to call on every render.
    pub fn item_count(&self) -> i64 {
        let state = self.state.lock().unwrap();
        state.cart.as_ref().map(Cart::item_count).unwrap_or(0)
    }

    /// Validated checkout handoff URL, or `None` (with a notice set) when
    /// the cart has no checkout URL or it fails the security gate.
    pub fn checkout(&self) -> Option<Url> {
        let raw = {
            let state = self.state.lock().unwrap();
            state.cart.as_ref().and_then(|c| c.checkout_url.clone())
        };

        let Some(raw) = raw else {
            self.set_notice(Notice::CheckoutBlocked);
            return None;
        };

        match validate_checkout_url(&raw, &self.allowed_checkout_hosts) {
            Some(url) => Some(url),
            None => {
                tracing::warn!(url = %raw, "Blocked checkout handoff to unvalidated URL");
                self.set_notice(Notice::CheckoutBlocked);
                None
            }
        }
    }

    /// Drop the cart and the persisted identifier. No network call.
    pub async fn clear(&self) {
        tracing::info!("Clearing cart");
        self.forget_cart(None).await;
    }

    /// Current view of the store.
    pub fn snapshot(&self) -> CartSnapshot {
        let state = self.state.lock().unwrap();
        CartSnapshot {
            cart: state.cart.clone(),
            cart_id: state.cart_id.clone(),
            loading: state.loading,
            notice: state.notice.clone(),
        }
    }

    fn current_cart_id(&self) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.cart.as_ref().map(|c| c.id.clone())
    }

    async fn resolve_mutation(&self, cart_id: &str, result: Result<Cart, CommerceError>) -> bool {
        match result {
            Ok(cart) => {
                self.adopt(cart, None);
                true
            }
            // Stale-line recovery takes priority over generic error handling.
            Err(err) if err.is_desync() => {
                self.recover_from_desync(cart_id).await;
                false
            }
            Err(err) => {
                tracing::warn!(%cart_id, error = %err, "Cart mutation failed");
                self.fail(Self::notice_for(&err));
                false
            }
        }
    }

    /// The remote cart has diverged from the local snapshot (expired
    /// reservation, concurrent removal elsewhere). Refetch it directly;
    /// when that fails too the cart is unrecoverable and all local state
    /// is dropped. Ends in exactly one of those two states.
    async fn recover_from_desync(&self, cart_id: &str) {
        tracing::warn!(%cart_id, "Cart line desync detected, refetching cart");

        match self.api.get_cart(cart_id).await {
            Ok(Some(cart)) => {
                self.adopt(cart.sanitize(), Some(Notice::CartRefreshed));
            }
            Ok(None) => {
                tracing::warn!(%cart_id, "Cart unrecoverable after desync, clearing");
                self.forget_cart(Some(Notice::CartCleared)).await;
            }
            Err(err) => {
                tracing::warn!(%cart_id, error = %err, "Refetch after desync failed, clearing");
                self.forget_cart(Some(Notice::CartCleared)).await;
            }
        }
    }

    fn notice_for(err: &CommerceError) -> Notice {
        match err {
            CommerceError::UserError { message, .. } => Notice::Validation(message.clone()),
            e if e.is_transient() => Notice::Network,
            _ => Notice::ServiceUnavailable,
        }
    }

    fn begin(&self) {
        let mut state = self.state.lock().unwrap();
        state.loading = true;
        state.notice = None;
    }

    /// Replace local cart state wholesale with the platform's snapshot.
    fn adopt(&self, cart: Cart, notice: Option<Notice>) {
        let mut state = self.state.lock().unwrap();
        state.cart_id = Some(cart.id.clone());
        state.cart = Some(cart);
        state.loading = false;
        state.notice = notice;
    }

    fn fail(&self, notice: Notice) {
        let mut state = self.state.lock().unwrap();
        state.loading = false;
        state.notice = Some(notice);
    }

    fn set_notice(&self, notice: Notice) {
        let mut state = self.state.lock().unwrap();
        state.notice = Some(notice);
    }

    async fn forget_cart(&self, notice: Option<Notice>) {
        if let Err(err) = self.ids.clear().await {
            tracing::warn!(error = %err, "Failed to clear persisted cart identifier");
        }
        let mut state = self.state.lock().unwrap();
        state.cart = None;
        state.cart_id = None;
        state.loading = false;
        state.notice = notice;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commerce::{CartCost, CartLine, ImageRef, Merchandise, Money, ProductSnapshot};
    use crate::db::init_database;
    use async_trait::async_trait;
    use tempfile::TempDir;

    fn money(amount: &str) -> Money {
        Money {
            amount: amount.to_string(),
            currency_code: "EUR".to_string(),
        }
    }

    fn merchandise(id: &str) -> Merchandise {
        Merchandise {
            id: id.to_string(),
            title: "Default".to_string(),
            price: money("10.00"),
            compare_at_price: None,
            product: ProductSnapshot {
                title: "Thing".to_string(),
                handle: "thing".to_string(),
                vendor: "Acme".to_string(),
                featured_image: Some(ImageRef {
                    url: "https://cdn.example.com/thing.jpg".to_string(),
                    alt_text: None,
                }),
            },
        }
    }

    fn line(id: &str, variant: &str, quantity: i64) -> CartLine {
        CartLine {
            id: id.to_string(),
            quantity,
            merchandise: Some(merchandise(variant)),
        }
    }

    fn cart(id: &str, lines: Vec<CartLine>) -> Cart {
        Cart {
            id: id.to_string(),
            created_at: None,
            updated_at: None,
            lines,
            cost: CartCost {
                total_amount: money("10.00"),
                subtotal_amount: money("10.00"),
            },
            checkout_url: Some("https://shop.myshopify.com/checkouts/abc".to_string()),
        }
    }

    /// Scriptable in-process commerce platform.
    #[derive(Default)]
    struct MockApi {
        /// What `get_cart` returns.
        remote_cart: Mutex<Option<Cart>>,
        /// One-shot error for the next mutation.
        next_mutation_error: Mutex<Option<CommerceError>>,
        /// One-shot error for the next `get_cart`.
        next_get_error: Mutex<Option<CommerceError>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockApi {
        fn record(&self, name: &str) {
            self.calls.lock().unwrap().push(name.to_string());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn mutation_result(&self, fallback: Cart) -> Result<Cart, CommerceError> {
            match self.next_mutation_error.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(fallback),
            }
        }
    }

    #[async_trait]
    impl CommerceApi for MockApi {
        async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, CommerceError> {
            self.record("create_cart");
            let lines = lines
                .iter()
                .enumerate()
                .map(|(i, input)| line(&format!("line-{}", i + 1), &input.merchandise_id, input.quantity))
                .collect();
            self.mutation_result(cart("cart-1", lines))
        }

        async fn add_lines(
            &self,
            cart_id: &str,
            lines: Vec<CartLineInput>,
        ) -> Result<Cart, CommerceError> {
            self.record("add_lines");
            let lines = lines
                .iter()
                .enumerate()
                .map(|(i, input)| line(&format!("line-{}", i + 10), &input.merchandise_id, input.quantity))
                .collect();
            self.mutation_result(cart(cart_id, lines))
        }

        async fn update_lines(
            &self,
            cart_id: &str,
            lines: Vec<CartLineUpdateInput>,
        ) -> Result<Cart, CommerceError> {
            self.record("update_lines");
            let lines = lines
                .iter()
                .map(|input| line(&input.id, "variant-updated", input.quantity))
                .collect();
            self.mutation_result(cart(cart_id, lines))
        }

        async fn remove_lines(
            &self,
            cart_id: &str,
            _line_ids: Vec<String>,
        ) -> Result<Cart, CommerceError> {
            self.record("remove_lines");
            self.mutation_result(cart(cart_id, vec![]))
        }

        async fn get_cart(&self, _cart_id: &str) -> Result<Option<Cart>, CommerceError> {
            self.record("get_cart");
            if let Some(err) = self.next_get_error.lock().unwrap().take() {
                return Err(err);
            }
            Ok(self.remote_cart.lock().unwrap().clone())
        }
    }

    async fn fixture() -> (Arc<MockApi>, CartStore, CartIdRepository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .expect("Failed to init DB");
        let ids = CartIdRepository::new(pool);
        let api = Arc::new(MockApi::default());
        let store = CartStore::new(
            api.clone(),
            ids.clone(),
            vec!["*.myshopify.com".to_string()],
        );
        (api, store, ids, temp_dir)
    }

    #[tokio::test]
    async fn test_add_creates_cart_and_persists_identifier() {
        let (api, store, ids, _dir) = fixture().await;

        assert!(store.add_to_cart("variant-123", 2).await);

        assert_eq!(store.item_count(), 2);
        assert_eq!(ids.get().await.unwrap(), Some("cart-1".to_string()));
        assert_eq!(api.calls(), vec!["create_cart"]);

        let snapshot = store.snapshot();
        assert!(!snapshot.loading);
        assert!(snapshot.notice.is_none());
    }

    #[tokio::test]
    async fn test_add_to_existing_cart_keeps_identifier_untouched() {
        let (api, store, ids, _dir) = fixture().await;

        assert!(store.add_to_cart("variant-123", 2).await);
        assert!(store.add_to_cart("variant-456", 1).await);

        // Second add goes through add_lines, not create_cart.
        assert_eq!(api.calls(), vec!["create_cart", "add_lines"]);
        assert_eq!(ids.get().await.unwrap(), Some("cart-1".to_string()));
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_input_without_network() {
        let (api, store, _ids, _dir) = fixture().await;

        assert!(!store.add_to_cart("", 1).await);
        assert!(!store.add_to_cart("variant-123", 0).await);

        assert!(api.calls().is_empty());
        assert!(matches!(store.snapshot().notice, Some(Notice::Validation(_))));
    }

    #[tokio::test]
    async fn test_successful_mutation_replaces_cart_wholesale() {
        let (_api, store, _ids, _dir) = fixture().await;

        assert!(store.add_to_cart("variant-123", 2).await);
        assert!(store.update_line("line-1", 5).await);

        // The local cart is exactly the platform's response, not a merge.
        let snapshot = store.snapshot();
        let cart = snapshot.cart.unwrap();
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 5);
        assert_eq!(
            cart.lines[0].merchandise.as_ref().unwrap().id,
            "variant-updated"
        );
        assert_eq!(store.item_count(), 5);
    }

    #[tokio::test]
    async fn test_update_without_cart_is_noop() {
        let (api, store, _ids, _dir) = fixture().await;

        assert!(!store.update_line("line-1", 3).await);
        assert!(!store.remove_line("line-1").await);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_desync_update_refetches_cart() {
        let (api, store, ids, _dir) = fixture().await;

        assert!(store.add_to_cart("variant-123", 2).await);

        *api.next_mutation_error.lock().unwrap() = Some(CommerceError::Desync(
            "The merchandise line with id line-1 does not exist".to_string(),
        ));
        *api.remote_cart.lock().unwrap() =
            Some(cart("cart-1", vec![line("line-2", "variant-456", 1)]));

        assert!(!store.update_line("line-1", 5).await);

        let snapshot = store.snapshot();
        let cart = snapshot.cart.unwrap();
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].id, "line-2");
        assert_eq!(store.item_count(), 1);
        assert_eq!(snapshot.notice, Some(Notice::CartRefreshed));
        assert!(!snapshot.loading);

        // The identifier survives a successful refresh.
        assert_eq!(ids.get().await.unwrap(), Some("cart-1".to_string()));
        assert_eq!(api.calls(), vec!["create_cart", "update_lines", "get_cart"]);
    }

    #[tokio::test]
    async fn test_desync_unrecoverable_clears_everything() {
        let (api, store, ids, _dir) = fixture().await;

        assert!(store.add_to_cart("variant-123", 2).await);

        *api.next_mutation_error.lock().unwrap() = Some(CommerceError::Desync(
            "The merchandise line with id line-1 does not exist".to_string(),
        ));
        *api.remote_cart.lock().unwrap() = None;

        assert!(!store.update_line("line-1", 5).await);

        let snapshot = store.snapshot();
        assert!(snapshot.cart.is_none());
        assert_eq!(store.item_count(), 0);
        assert_eq!(snapshot.notice, Some(Notice::CartCleared));
        assert_eq!(ids.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_line_desync_recovery() {
        let (api, store, _ids, _dir) = fixture().await;

        assert!(store.add_to_cart("variant-123", 2).await);

        *api.next_mutation_error.lock().unwrap() = Some(CommerceError::Desync(
            "Invalid merchandise line".to_string(),
        ));
        *api.remote_cart.lock().unwrap() =
            Some(cart("cart-1", vec![line("line-9", "variant-789", 4)]));

        assert!(!store.remove_line("line-1").await);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.cart.unwrap().lines[0].id, "line-9");
        assert_eq!(snapshot.notice, Some(Notice::CartRefreshed));
    }

    #[tokio::test]
    async fn test_validation_error_keeps_previous_cart() {
        let (api, store, _ids, _dir) = fixture().await;

        assert!(store.add_to_cart("variant-123", 2).await);

        *api.next_mutation_error.lock().unwrap() = Some(CommerceError::UserError {
            field: None,
            message: "Insufficient stock".to_string(),
        });

        assert!(!store.add_to_cart("variant-456", 1).await);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.cart.unwrap().lines[0].id, "line-1");
        assert_eq!(store.item_count(), 2);
        assert_eq!(
            snapshot.notice,
            Some(Notice::Validation("Insufficient stock".to_string()))
        );
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_load_cart_sanitizes_lines() {
        let (api, store, ids, _dir) = fixture().await;

        ids.set("cart-1").await.unwrap();
        *api.remote_cart.lock().unwrap() = Some(cart(
            "cart-1",
            vec![
                line("line-1", "variant-123", 2),
                line("line-2", "variant-456", 0),
                CartLine {
                    id: "line-3".to_string(),
                    quantity: 3,
                    merchandise: None,
                },
            ],
        ));

        store.load_cart().await;

        let snapshot = store.snapshot();
        let cart = snapshot.cart.unwrap();
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].id, "line-1");
        assert_eq!(store.item_count(), 2);
    }

    #[tokio::test]
    async fn test_load_cart_without_identifier_is_noop() {
        let (api, store, _ids, _dir) = fixture().await;

        store.load_cart().await;

        assert!(api.calls().is_empty());
        assert!(store.snapshot().cart.is_none());
    }

    #[tokio::test]
    async fn test_load_cart_transient_failure_preserves_identifier() {
        let (api, store, ids, _dir) = fixture().await;

        ids.set("cart-1").await.unwrap();
        *api.next_get_error.lock().unwrap() = Some(CommerceError::Status(503));

        store.load_cart().await;

        assert_eq!(ids.get().await.unwrap(), Some("cart-1".to_string()));
        let snapshot = store.snapshot();
        assert!(snapshot.cart.is_none());
        assert_eq!(snapshot.notice, Some(Notice::SyncIssue));
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_load_cart_missing_remote_clears_identifier() {
        let (api, store, ids, _dir) = fixture().await;

        ids.set("cart-gone").await.unwrap();
        *api.remote_cart.lock().unwrap() = None;

        store.load_cart().await;

        assert_eq!(ids.get().await.unwrap(), None);
        assert!(store.snapshot().cart.is_none());
        assert_eq!(api.calls(), vec!["get_cart"]);
    }

    #[tokio::test]
    async fn test_load_cart_terminal_error_clears_identifier() {
        let (api, store, ids, _dir) = fixture().await;

        ids.set("cart-1").await.unwrap();
        *api.next_get_error.lock().unwrap() =
            Some(CommerceError::GraphQl("access denied".to_string()));

        store.load_cart().await;

        assert_eq!(ids.get().await.unwrap(), None);
        let snapshot = store.snapshot();
        assert!(snapshot.cart.is_none());
        assert_eq!(snapshot.notice, Some(Notice::CartCleared));
    }

    #[tokio::test]
    async fn test_checkout_hands_out_validated_url_only() {
        let (_api, store, _ids, _dir) = fixture().await;

        // No cart: blocked.
        assert!(store.checkout().is_none());
        assert_eq!(store.snapshot().notice, Some(Notice::CheckoutBlocked));

        assert!(store.add_to_cart("variant-123", 1).await);
        let url = store.checkout().expect("validated checkout URL");
        assert_eq!(url.host_str(), Some("shop.myshopify.com"));
    }

    #[tokio::test]
    async fn test_checkout_blocks_unvalidated_url() {
        let (api, store, _ids, _dir) = fixture().await;

        assert!(store.add_to_cart("variant-123", 1).await);

        // Replace the remote snapshot with one pointing somewhere hostile.
        let mut bad = cart("cart-1", vec![line("line-1", "variant-123", 1)]);
        bad.checkout_url = Some("http://evil.example.com/checkout".to_string());
        *api.remote_cart.lock().unwrap() = Some(bad);
        *api.next_mutation_error.lock().unwrap() = Some(CommerceError::Desync(
            "line does not exist".to_string(),
        ));
        store.update_line("line-1", 2).await;

        assert!(store.checkout().is_none());
        assert_eq!(store.snapshot().notice, Some(Notice::CheckoutBlocked));
    }

    #[tokio::test]
    async fn test_clear_cart_drops_identifier_and_state() {
        let (_api, store, ids, _dir) = fixture().await;

        assert!(store.add_to_cart("variant-123", 2).await);
        store.clear().await;

        assert_eq!(store.item_count(), 0);
        assert!(store.snapshot().cart.is_none());
        assert_eq!(ids.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_network_failure_resets_loading_flag() {
        let (api, store, _ids, _dir) = fixture().await;

        *api.next_mutation_error.lock().unwrap() = Some(CommerceError::Status(502));

        assert!(!store.add_to_cart("variant-123", 1).await);

        let snapshot = store.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.notice, Some(Notice::Network));
    }
}
