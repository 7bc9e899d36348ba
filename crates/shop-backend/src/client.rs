//! # HTTP Gateway
//!
//! `PaymentGateway` implementation over the demo payments backend's REST
//! endpoints. Every operation catches transport failures and
//! backend-reported business errors (`error` field in the payload) and
//! converts them into tagged `ShopError` values; nothing here throws
//! past the caller.

use crate::config::BackendConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shop_core::{
    Charge, ChargeRequest, CreateIntentRequest, GatewayConfig, PaymentGateway, PaymentIntent,
    Product, ShopError, ShopResult, Sku, UpdateIntentRequest,
};
use tracing::{debug, error, info, instrument};

/// Gateway to the payments backend
pub struct HttpGateway {
    config: BackendConfig,
    client: Client,
}

impl HttpGateway {
    /// Create a new gateway
    pub fn new(config: BackendConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> ShopResult<Self> {
        let config = BackendConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Read a response body, surfacing non-2xx statuses as gateway errors
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ShopResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Backend error: status={}, body={}", status, body);

            if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
                return Err(ShopError::Gateway {
                    message: envelope.error.message(),
                });
            }

            return Err(ShopError::Gateway {
                message: format!("HTTP {}: {}", status, body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ShopError::Serialization(format!("Failed to parse response: {}", e)))
    }

    /// Unwrap a payment-intent envelope (`{paymentIntent}` or `{error}`)
    fn unwrap_intent(envelope: IntentEnvelope) -> ShopResult<PaymentIntent> {
        if let Some(err) = envelope.error {
            return Err(ShopError::Gateway {
                message: err.message(),
            });
        }
        envelope.payment_intent.ok_or_else(|| {
            ShopError::Serialization("Response has neither paymentIntent nor error".to_string())
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    #[instrument(skip(self))]
    async fn fetch_config(&self) -> ShopResult<GatewayConfig> {
        let url = self.config.endpoint("/config");
        debug!("Fetching store config");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        Self::read_json(response).await
    }

    #[instrument(skip(self))]
    async fn fetch_products(&self) -> ShopResult<Vec<Product>> {
        let url = self.config.endpoint("/products");
        debug!("Fetching product list");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        let list: ListEnvelope<Product> = Self::read_json(response).await?;
        info!("Loaded {} products", list.data.len());
        Ok(list.data)
    }

    #[instrument(skip(self))]
    async fn fetch_skus(&self, product_id: &str) -> ShopResult<Vec<Sku>> {
        let url = self
            .config
            .endpoint(&format!("/products/{}/skus", product_id));
        debug!("Fetching SKUs for {}", product_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        let list: ListEnvelope<Sku> = Self::read_json(response).await?;
        Ok(list.data)
    }

    #[instrument(skip(self, request), fields(items = request.items.len()))]
    async fn create_payment_intent(
        &self,
        request: &CreateIntentRequest,
    ) -> ShopResult<PaymentIntent> {
        let url = self.config.endpoint("/payment_intents");
        debug!("Creating payment intent: {} items", request.items.len());

        let mut builder = self.client.post(&url).json(request);
        if let Some(ref key) = request.idempotency_key {
            builder = builder.header("Idempotency-Key", key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        let intent = Self::unwrap_intent(Self::read_json(response).await?)?;
        info!("Created payment intent: id={}, amount={}", intent.id, intent.amount);
        Ok(intent)
    }

    #[instrument(skip(self, request), fields(intent_id = %intent_id))]
    async fn update_payment_intent(
        &self,
        intent_id: &str,
        request: &UpdateIntentRequest,
    ) -> ShopResult<PaymentIntent> {
        let url = self
            .config
            .endpoint(&format!("/payment_intents/{}/shipping_change", intent_id));
        debug!("Updating payment intent: {} items", request.items.len());

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        let intent = Self::unwrap_intent(Self::read_json(response).await?)?;
        info!("Updated payment intent: id={}, amount={}", intent.id, intent.amount);
        Ok(intent)
    }

    #[instrument(skip(self, request), fields(amount = request.amount))]
    async fn create_charge(&self, request: &ChargeRequest) -> ShopResult<Charge> {
        let url = self.config.endpoint("/charges");
        debug!("Creating charge: amount={}", request.amount);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        let charge: Charge = Self::read_json(response).await?;
        info!("Created charge: id={}, status={:?}", charge.id, charge.status);
        Ok(charge)
    }

    fn gateway_name(&self) -> &'static str {
        "http"
    }
}

// =============================================================================
// Wire Envelopes
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ListEnvelope<T> {
    #[serde(default)]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntentEnvelope {
    #[serde(default)]
    payment_intent: Option<PaymentIntent>,
    #[serde(default)]
    error: Option<ErrorPayload>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

/// The backend reports business errors either as a bare string or as an
/// object with a message field
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorPayload {
    Message(String),
    Detailed { message: String },
}

impl ErrorPayload {
    fn message(&self) -> String {
        match self {
            ErrorPayload::Message(m) => m.clone(),
            ErrorPayload::Detailed { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shop_core::{Currency, OrderController, SyncOutcome};
    use std::sync::Arc;
    use wiremock::matchers::{body_partial_json, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> Arc<HttpGateway> {
        let config = BackendConfig::new(server.uri()).unwrap();
        Arc::new(HttpGateway::new(config))
    }

    fn config_body() -> serde_json::Value {
        json!({
            "stripePublishableKey": "pk_test_abc",
            "country": "US",
            "currency": "usd",
            "shippingOptions": [
                {"id": "free", "label": "Free Shipping", "amount": 0},
                {"id": "express", "label": "Express Shipping", "amount": 500}
            ]
        })
    }

    fn products_body() -> serde_json::Value {
        json!({
            "data": [
                {
                    "id": "increment",
                    "name": "Increment Magazine",
                    "skus": [
                        {"id": "sku_increment", "price": 1000, "currency": "usd"}
                    ]
                }
            ]
        })
    }

    async fn mount_store(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(config_body()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(products_body()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_products() {
        let server = MockServer::start().await;
        mount_store(&server).await;

        let gateway = gateway_for(&server);
        let products = gateway.fetch_products().await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "increment");
        assert_eq!(products[0].skus[0].price, 1000);
    }

    #[tokio::test]
    async fn test_lazy_sku_fetch_and_memoized_load() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "pins", "name": "Pins"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/products/pins/skus"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "sku_pins", "price": 799, "currency": "usd"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let controller = OrderController::new(gateway_for(&server));

        // Two concurrent loads share one fetch per endpoint
        let (a, b) = tokio::join!(controller.load_catalog(), controller.load_catalog());
        assert!(a.is_ok());
        assert!(b.is_ok());

        let catalog = controller.catalog().unwrap();
        assert_eq!(catalog.get("pins").unwrap().skus[0].price, 799);
    }

    #[tokio::test]
    async fn test_end_to_end_quantity_edit() {
        let server = MockServer::start().await;
        mount_store(&server).await;
        Mock::given(method("POST"))
            .and(path("/payment_intents"))
            .and(header_exists("Idempotency-Key"))
            .and(body_partial_json(json!({
                "currency": "usd",
                "items": [{"type": "sku", "parent": "sku_increment", "quantity": 3}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "paymentIntent": {
                    "id": "pi_123",
                    "amount": 3000,
                    "currency": "usd",
                    "status": "requires_payment_method",
                    "client_secret": "pi_123_secret"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let controller = OrderController::new(gateway_for(&server));
        controller.bootstrap().await.unwrap();

        // Quantity 3 at 1000 minor units: total 3000, displayed $30.00
        let snapshot = controller.set_quantity("increment", "3").unwrap();
        assert_eq!(snapshot.total, 3000);
        assert_eq!(snapshot.formatted_total, "$30.00");
        assert_eq!(snapshot.pay_label, "Pay $30.00");

        let outcome = controller.sync_payment_intent().await.unwrap();
        assert!(outcome.is_synced());
        assert_eq!(controller.payment_intent().unwrap().amount, 3000);

        // Back to zero: total 0 and no further intent call (expect(1) above)
        let snapshot = controller.set_quantity("increment", "0").unwrap();
        assert_eq!(snapshot.total, 0);
        let outcome = controller.sync_payment_intent().await.unwrap();
        assert!(matches!(outcome, SyncOutcome::Skipped));
    }

    #[tokio::test]
    async fn test_shipping_change_update() {
        let server = MockServer::start().await;
        mount_store(&server).await;
        Mock::given(method("POST"))
            .and(path("/payment_intents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "paymentIntent": {"id": "pi_123", "amount": 1000, "currency": "usd"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/payment_intents/pi_123/shipping_change"))
            .and(body_partial_json(json!({
                "shippingOption": {"id": "express", "label": "Express Shipping", "amount": 500},
                "items": [{"type": "sku", "parent": "sku_increment", "quantity": 2}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "paymentIntent": {"id": "pi_123", "amount": 2500, "currency": "usd"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let controller = OrderController::new(gateway_for(&server));
        controller.bootstrap().await.unwrap();

        controller.set_quantity("increment", "1").unwrap();
        controller.sync_payment_intent().await.unwrap();

        controller.select_shipping(shop_core::ShippingOption {
            id: "express".to_string(),
            label: "Express Shipping".to_string(),
            amount: 500,
        });
        controller.set_quantity("increment", "2").unwrap();
        controller.sync_payment_intent().await.unwrap();

        assert_eq!(controller.payment_intent().unwrap().amount, 2500);
    }

    #[tokio::test]
    async fn test_backend_business_error() {
        let server = MockServer::start().await;
        mount_store(&server).await;
        Mock::given(method("POST"))
            .and(path("/payment_intents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": "Unsupported currency"
            })))
            .mount(&server)
            .await;

        let controller = OrderController::new(gateway_for(&server));
        controller.bootstrap().await.unwrap();
        controller.set_quantity("increment", "1").unwrap();

        let err = controller.sync_payment_intent().await.unwrap_err();
        assert!(matches!(err, ShopError::Gateway { .. }));
        // Failed sync leaves local intent state unchanged
        assert!(controller.payment_intent().is_none());
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": {"message": "backend exploded"}
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let err = gateway.fetch_products().await.unwrap_err();
        assert!(matches!(err, ShopError::Gateway { .. }));
        assert!(err.to_string().contains("backend exploded"));
    }

    #[tokio::test]
    async fn test_network_failure() {
        // Nothing listens here
        let config = BackendConfig::new("http://127.0.0.1:1").unwrap();
        let gateway = HttpGateway::new(config);

        let err = gateway.fetch_config().await.unwrap_err();
        assert!(matches!(err, ShopError::NetworkError(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_create_charge() {
        let server = MockServer::start().await;
        mount_store(&server).await;
        Mock::given(method("POST"))
            .and(path("/charges"))
            .and(body_partial_json(json!({
                "source": "tok_visa",
                "amount": 2000,
                "currency": "usd"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "ch_123",
                "amount": 2000,
                "currency": "usd",
                "status": "succeeded"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let controller = OrderController::new(gateway_for(&server));
        controller.bootstrap().await.unwrap();
        controller.set_quantity("increment", "2").unwrap();

        let charge = controller.create_charge("tok_visa").await.unwrap();
        assert_eq!(charge.amount, 2000);
        assert_eq!(charge.currency, Currency::USD);
    }
}
