//! # Order Controller
//!
//! Owns all mutable checkout state: catalog, per-product quantities,
//! shipping selection, and the active payment-intent reference. The
//! controller is an explicit context object: clone it into event
//! handlers instead of reaching for a global.
//!
//! State mutation is synchronous; gateway I/O happens outside the locks.
//! Payment-intent synchronizations are sequenced with a monotonic counter
//! so a response that arrives after a newer sync was issued is discarded
//! rather than overwriting fresher state.

use crate::cart::{parse_quantity, Cart, CartSnapshot};
use crate::catalog::Catalog;
use crate::error::{ShopError, ShopResult};
use crate::gateway::{
    BoxedGateway, ChargeRequest, CreateIntentRequest, GatewayConfig, PaymentIntent,
    ShippingOption, UpdateIntentRequest,
};
use crate::money::{Currency, Price};
use crate::observer::{CartObserver, NoopObserver};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Outcome of a payment-intent synchronization
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    /// Every line item had zero quantity; no network call was made
    Skipped,
    /// A newer sync was issued while this one was in flight; the
    /// response was discarded
    Superseded,
    /// The backend intent now reflects the snapshot that was sent
    Synced(PaymentIntent),
}

impl SyncOutcome {
    /// True if the backend intent was updated by this call
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced(_))
    }
}

/// The backend intent reference plus when it was last reconciled
#[derive(Debug, Clone)]
struct IntentState {
    intent: PaymentIntent,
    synced_at: DateTime<Utc>,
}

struct ControllerInner {
    gateway: BoxedGateway,
    observer: Arc<dyn CartObserver>,

    /// Session identifier; doubles as the idempotency key for intent
    /// creation and as order metadata on charges
    session_id: String,

    /// Memoized catalog load: at most one in-flight fetch, concurrent
    /// callers share the pending result
    catalog: OnceCell<Catalog>,

    config: Mutex<Option<GatewayConfig>>,
    cart: Mutex<Option<Cart>>,
    shipping: Mutex<Option<ShippingOption>>,
    intent: Mutex<Option<IntentState>>,

    /// Monotonic sequence for payment-intent syncs
    sync_seq: AtomicU64,
}

/// The checkout controller (see module docs)
#[derive(Clone)]
pub struct OrderController {
    inner: Arc<ControllerInner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl OrderController {
    /// Create a controller over a gateway, with no observer
    pub fn new(gateway: BoxedGateway) -> Self {
        Self::with_observer(gateway, Arc::new(NoopObserver))
    }

    /// Create a controller with a change observer
    pub fn with_observer(gateway: BoxedGateway, observer: Arc<dyn CartObserver>) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                gateway,
                observer,
                session_id: Uuid::new_v4().to_string(),
                catalog: OnceCell::new(),
                config: Mutex::new(None),
                cart: Mutex::new(None),
                shipping: Mutex::new(None),
                intent: Mutex::new(None),
                sync_seq: AtomicU64::new(0),
            }),
        }
    }

    /// Session identifier for this controller
    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    /// Fetch store config and catalog, then build the zero-quantity cart.
    ///
    /// Returns the initial snapshot for first render.
    pub async fn bootstrap(&self) -> ShopResult<CartSnapshot> {
        let config = self.inner.gateway.fetch_config().await?;
        let currency = config.currency;
        let default_shipping = config.shipping_options.first().cloned();

        *lock(&self.inner.config) = Some(config);
        if let Some(option) = default_shipping {
            let mut shipping = lock(&self.inner.shipping);
            if shipping.is_none() {
                *shipping = Some(option);
            }
        }

        let catalog = self.load_catalog().await?;
        let cart = Cart::from_catalog(catalog, currency)?;
        let snapshot = cart.snapshot();
        *lock(&self.inner.cart) = Some(cart);

        self.inner.observer.on_cart_changed(&snapshot);
        Ok(snapshot)
    }

    /// Load the product catalog, attaching SKUs to products that arrived
    /// without pricing data.
    ///
    /// Memoized: a second call while the first is in flight waits for the
    /// same pending load instead of issuing duplicate requests. A failed
    /// load is not cached, so the next call retries.
    pub async fn load_catalog(&self) -> ShopResult<&Catalog> {
        self.inner
            .catalog
            .get_or_try_init(|| async {
                let mut products = self.inner.gateway.fetch_products().await?;
                if products.is_empty() {
                    return Err(ShopError::EmptyCatalog);
                }
                for product in &mut products {
                    if !product.has_pricing() {
                        product.skus = self.inner.gateway.fetch_skus(&product.id).await?;
                    }
                }
                Ok(Catalog { products })
            })
            .await
    }

    /// The loaded catalog, if any
    pub fn catalog(&self) -> Option<&Catalog> {
        self.inner.catalog.get()
    }

    /// The store currency (from config; USD until bootstrapped)
    pub fn currency(&self) -> Currency {
        lock(&self.inner.config)
            .as_ref()
            .map(|c| c.currency)
            .unwrap_or_default()
    }

    /// The store configuration, if fetched
    pub fn config(&self) -> Option<GatewayConfig> {
        lock(&self.inner.config).clone()
    }

    /// Parse a raw quantity input and apply it to the product's line item.
    ///
    /// Empty/non-numeric input stores 0; negative input clamps to 0. The
    /// recomputed snapshot is delivered to the observer and returned. No
    /// I/O happens here; callers trigger `sync_payment_intent` as a
    /// fire-and-forget task after each edit.
    pub fn set_quantity(&self, product_id: &str, raw: &str) -> ShopResult<CartSnapshot> {
        let quantity = parse_quantity(raw);
        let snapshot = {
            let mut guard = lock(&self.inner.cart);
            let cart = guard
                .as_mut()
                .ok_or_else(|| ShopError::Configuration("store not bootstrapped".to_string()))?;
            cart.set_quantity(product_id, quantity)?;
            cart.snapshot()
        };

        self.inner.observer.on_cart_changed(&snapshot);
        Ok(snapshot)
    }

    /// Current snapshot of the cart
    pub fn snapshot(&self) -> ShopResult<CartSnapshot> {
        let guard = lock(&self.inner.cart);
        let cart = guard
            .as_ref()
            .ok_or_else(|| ShopError::Configuration("store not bootstrapped".to_string()))?;
        Ok(cart.snapshot())
    }

    /// Current cart total
    pub fn total(&self) -> ShopResult<Price> {
        let guard = lock(&self.inner.cart);
        let cart = guard
            .as_ref()
            .ok_or_else(|| ShopError::Configuration("store not bootstrapped".to_string()))?;
        Ok(cart.total())
    }

    /// Select a shipping option; included in subsequent intent updates
    pub fn select_shipping(&self, option: ShippingOption) {
        *lock(&self.inner.shipping) = Some(option);
    }

    /// The active payment intent, if one has been created
    pub fn payment_intent(&self) -> Option<PaymentIntent> {
        lock(&self.inner.intent).as_ref().map(|s| s.intent.clone())
    }

    /// When the intent was last reconciled with the backend
    pub fn intent_synced_at(&self) -> Option<DateTime<Utc>> {
        lock(&self.inner.intent).as_ref().map(|s| s.synced_at)
    }

    /// Reconcile the backend payment intent with the current line items.
    ///
    /// Short-circuits without a network call when every quantity is zero.
    /// Creates the intent on first use, updates it afterwards. Responses
    /// that land after a newer sync was issued are discarded, so the
    /// recorded intent always reflects the latest snapshot sent.
    pub async fn sync_payment_intent(&self) -> ShopResult<SyncOutcome> {
        let (items, currency, all_zero) = {
            let guard = lock(&self.inner.cart);
            let cart = guard
                .as_ref()
                .ok_or_else(|| ShopError::Configuration("store not bootstrapped".to_string()))?;
            (
                cart.items().iter().map(Into::into).collect::<Vec<_>>(),
                cart.currency(),
                cart.is_all_zero(),
            )
        };

        if all_zero {
            return Ok(SyncOutcome::Skipped);
        }

        let seq = self.inner.sync_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let existing = lock(&self.inner.intent)
            .as_ref()
            .map(|s| s.intent.id.clone());

        let result = match existing {
            None => {
                let request = CreateIntentRequest {
                    currency,
                    items,
                    idempotency_key: Some(self.inner.session_id.clone()),
                };
                self.inner.gateway.create_payment_intent(&request).await
            }
            Some(intent_id) => {
                let request = UpdateIntentRequest {
                    shipping_option: lock(&self.inner.shipping).clone(),
                    items,
                };
                self.inner
                    .gateway
                    .update_payment_intent(&intent_id, &request)
                    .await
            }
        };

        match result {
            Ok(intent) => {
                if self.inner.sync_seq.load(Ordering::SeqCst) != seq {
                    return Ok(SyncOutcome::Superseded);
                }
                *lock(&self.inner.intent) = Some(IntentState {
                    intent: intent.clone(),
                    synced_at: Utc::now(),
                });
                self.inner.observer.on_intent_synced(&intent);
                Ok(SyncOutcome::Synced(intent))
            }
            Err(err) => {
                self.inner.observer.on_sync_error(&err);
                Err(err)
            }
        }
    }

    /// Charge the current total against a payment source token
    pub async fn create_charge(&self, source: &str) -> ShopResult<crate::gateway::Charge> {
        let total = self.total()?;
        if total.amount == 0 {
            return Err(ShopError::InvalidRequest(
                "cannot charge an empty cart".to_string(),
            ));
        }

        let mut metadata = HashMap::new();
        metadata.insert("order_id".to_string(), self.inner.session_id.clone());
        if let Some(intent) = self.payment_intent() {
            metadata.insert("payment_intent_id".to_string(), intent.id);
        }

        let request = ChargeRequest {
            source: source.to_string(),
            amount: total.amount,
            currency: total.currency,
            metadata,
        };
        self.inner.gateway.create_charge(&request).await
    }
}
