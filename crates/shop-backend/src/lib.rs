//! # shop-backend
//!
//! HTTP gateway to the payments backend for checkout-rs.
//!
//! Implements `shop_core::PaymentGateway` over the backend's REST
//! surface:
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/config` | Store configuration |
//! | GET | `/products` | Product list |
//! | GET | `/products/{id}/skus` | SKUs for a product |
//! | POST | `/payment_intents` | Create payment intent |
//! | POST | `/payment_intents/{id}/shipping_change` | Update intent |
//! | POST | `/charges` | Create charge |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_backend::HttpGateway;
//! use shop_core::OrderController;
//! use std::sync::Arc;
//!
//! let gateway = Arc::new(HttpGateway::from_env()?);
//! let controller = OrderController::new(gateway);
//! let snapshot = controller.bootstrap().await?;
//! ```

pub mod client;
pub mod config;

// Re-exports
pub use client::HttpGateway;
pub use config::BackendConfig;
