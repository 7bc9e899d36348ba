//! # Payment Gateway Trait
//!
//! Seam between the order controller and the payments backend.
//! The HTTP implementation lives in `shop-backend`; tests inject
//! in-memory doubles.

use crate::cart::LineItem;
use crate::catalog::{Product, Sku};
use crate::error::ShopResult;
use crate::money::Currency;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Store configuration advertised by `GET /config`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Publishable key handed to the payment form
    pub stripe_publishable_key: String,

    /// Store country code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Currency all prices are quoted in
    pub currency: Currency,

    /// Shipping options the store offers
    #[serde(default)]
    pub shipping_options: Vec<ShippingOption>,
}

/// A shipping option offered at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingOption {
    /// Option identifier (e.g., "free", "express")
    pub id: String,

    /// Display label
    pub label: String,

    /// Shipping cost in smallest currency unit
    #[serde(default)]
    pub amount: i64,
}

/// Item descriptor sent to the payment-intent endpoints:
/// `{"type": "sku", "parent": <sku id>, "quantity": <n>}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub parent: String,
    pub quantity: u32,
}

impl From<&LineItem> for IntentItem {
    fn from(item: &LineItem) -> Self {
        Self {
            kind: "sku".to_string(),
            parent: item.sku_id.clone(),
            quantity: item.quantity,
        }
    }
}

/// A backend-tracked payment intent, updatable as cart contents change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Backend-assigned identifier
    pub id: String,

    /// Amount in smallest currency unit
    pub amount: i64,

    /// Currency
    pub currency: Currency,

    /// Intent status as reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Client secret for confirming the payment in the payment form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

/// Body for `POST /payment_intents`
#[derive(Debug, Clone, Serialize)]
pub struct CreateIntentRequest {
    pub currency: Currency,
    pub items: Vec<IntentItem>,

    /// Sent as an `Idempotency-Key` header, not in the body; one key per
    /// store session so a duplicated create cannot mint a second intent.
    #[serde(skip_serializing)]
    pub idempotency_key: Option<String>,
}

/// Body for `POST /payment_intents/{id}/shipping_change`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIntentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_option: Option<ShippingOption>,
    pub items: Vec<IntentItem>,
}

/// Body for `POST /charges`
#[derive(Debug, Clone, Serialize)]
pub struct ChargeRequest {
    /// Payment source token
    pub source: String,

    /// Amount in smallest currency unit
    pub amount: i64,

    /// Currency
    pub currency: Currency,

    /// Order metadata forwarded to the backend
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

/// Charge result object
#[derive(Debug, Clone, Deserialize)]
pub struct Charge {
    pub id: String,
    pub amount: i64,
    pub currency: Currency,
    #[serde(default)]
    pub status: Option<String>,
}

/// Core trait for the payments backend.
///
/// Covers the REST surface the store consumes: configuration, catalog,
/// payment intents, and charges. Every method isolates its own failure
/// and returns a tagged result; nothing here panics.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// `GET /config`
    async fn fetch_config(&self) -> ShopResult<GatewayConfig>;

    /// `GET /products`
    async fn fetch_products(&self) -> ShopResult<Vec<Product>>;

    /// `GET /products/{id}/skus`
    async fn fetch_skus(&self, product_id: &str) -> ShopResult<Vec<Sku>>;

    /// `POST /payment_intents`
    async fn create_payment_intent(
        &self,
        request: &CreateIntentRequest,
    ) -> ShopResult<PaymentIntent>;

    /// `POST /payment_intents/{id}/shipping_change`
    async fn update_payment_intent(
        &self,
        intent_id: &str,
        request: &UpdateIntentRequest,
    ) -> ShopResult<PaymentIntent>;

    /// `POST /charges`
    async fn create_charge(&self, request: &ChargeRequest) -> ShopResult<Charge>;

    /// Get the gateway name (for logging)
    fn gateway_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedGateway = Arc<dyn PaymentGateway>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Price;

    #[test]
    fn test_intent_item_from_line_item() {
        let line = LineItem {
            product_id: "increment".to_string(),
            sku_id: "sku_increment".to_string(),
            name: "Increment Magazine".to_string(),
            unit_price: Price::from_cents(399, Currency::USD),
            quantity: 3,
        };

        let item = IntentItem::from(&line);
        assert_eq!(item.kind, "sku");
        assert_eq!(item.parent, "sku_increment");
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn test_intent_item_wire_shape() {
        let item = IntentItem {
            kind: "sku".to_string(),
            parent: "sku_shirt".to_string(),
            quantity: 2,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "sku", "parent": "sku_shirt", "quantity": 2})
        );
    }

    #[test]
    fn test_update_request_wire_shape() {
        let request = UpdateIntentRequest {
            shipping_option: Some(ShippingOption {
                id: "free".to_string(),
                label: "Free Shipping".to_string(),
                amount: 0,
            }),
            items: vec![],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("shippingOption").is_some());
        assert!(json.get("items").is_some());
    }

    #[test]
    fn test_config_wire_shape() {
        let config: GatewayConfig = serde_json::from_value(serde_json::json!({
            "stripePublishableKey": "pk_test_abc",
            "currency": "usd",
            "shippingOptions": [
                {"id": "free", "label": "Free Shipping", "amount": 0}
            ]
        }))
        .unwrap();

        assert_eq!(config.currency, Currency::USD);
        assert_eq!(config.shipping_options.len(), 1);
        assert!(config.country.is_none());
    }
}
