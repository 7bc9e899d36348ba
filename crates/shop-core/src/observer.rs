//! # Cart Change Notifications
//!
//! Presentation layers subscribe to state changes instead of the
//! controller touching any rendering. Implement `CartObserver` and hand
//! it to the controller; every mutation delivers a fresh snapshot.

use crate::cart::CartSnapshot;
use crate::error::ShopError;
use crate::gateway::PaymentIntent;

/// Observer trait for cart and payment-intent changes.
///
/// All methods have no-op defaults; implement only the ones you render.
#[allow(unused_variables)]
pub trait CartObserver: Send + Sync {
    /// Called after every quantity mutation with the recomputed snapshot
    fn on_cart_changed(&self, snapshot: &CartSnapshot) {}

    /// Called when a payment-intent synchronization lands
    fn on_intent_synced(&self, intent: &PaymentIntent) {}

    /// Called when a payment-intent synchronization fails.
    /// The cart state is left unchanged; the next edit retries.
    fn on_sync_error(&self, error: &ShopError) {}
}

/// Default observer that ignores every notification
pub struct NoopObserver;

impl CartObserver for NoopObserver {}
