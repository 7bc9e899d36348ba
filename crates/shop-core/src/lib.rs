//! # shop-core
//!
//! Core types and the order reconciliation engine for checkout-rs.
//!
//! This crate provides:
//! - `OrderController` for catalog + quantity state, totals, and
//!   payment-intent synchronization with request sequencing
//! - `PaymentGateway` trait for talking to the payments backend
//! - `Product`, `Sku`, and `Catalog` for the product catalog
//! - `Cart`, `LineItem`, and `CartSnapshot` for quantity state
//! - `CartObserver` for presentation-layer change subscriptions
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{OrderController, SyncOutcome};
//!
//! // Gateway comes from shop-backend (or a test double)
//! let controller = OrderController::new(gateway);
//!
//! // Fetch config + catalog, build the zero-quantity cart
//! let snapshot = controller.bootstrap().await?;
//! println!("{}", snapshot.pay_label); // "Pay $0.00"
//!
//! // A quantity edit recomputes the total synchronously...
//! let snapshot = controller.set_quantity("increment", "3")?;
//!
//! // ...and the backend intent is reconciled as a separate task
//! let sync = controller.clone();
//! tokio::spawn(async move { sync.sync_payment_intent().await });
//! ```

pub mod cart;
pub mod catalog;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod money;
pub mod observer;

// Re-exports for convenience
pub use cart::{parse_quantity, Cart, CartSnapshot, LineItem};
pub use catalog::{Catalog, Product, Sku};
pub use controller::{OrderController, SyncOutcome};
pub use error::{ShopError, ShopResult};
pub use gateway::{
    BoxedGateway, Charge, ChargeRequest, CreateIntentRequest, GatewayConfig, IntentItem,
    PaymentGateway, PaymentIntent, ShippingOption, UpdateIntentRequest,
};
pub use money::{Currency, Price};
pub use observer::{CartObserver, NoopObserver};
