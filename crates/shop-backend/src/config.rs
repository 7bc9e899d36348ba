//! # Backend Configuration
//!
//! Configuration for the payments-backend connection.
//! Loaded from environment variables.

use shop_core::{ShopError, ShopResult};
use std::env;

/// Connection settings for the payments backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend (e.g., "http://localhost:4242")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Load configuration from environment variables.
    ///
    /// Env vars:
    /// - `SHOP_BACKEND_URL` (default `http://localhost:4242`)
    /// - `SHOP_BACKEND_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> ShopResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let base_url = env::var("SHOP_BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:4242".to_string());

        let timeout_secs = env::var("SHOP_BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(30);

        Self::new(base_url).map(|c| c.with_timeout(timeout_secs))
    }

    /// Create config with an explicit base URL
    pub fn new(base_url: impl Into<String>) -> ShopResult<Self> {
        let base_url: String = base_url.into();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ShopError::Configuration(format!(
                "SHOP_BACKEND_URL must start with http:// or https://, got {}",
                base_url
            )));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs: 30,
        })
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Build a full endpoint URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let config = BackendConfig::new("http://localhost:4242/").unwrap();
        assert_eq!(config.base_url, "http://localhost:4242");
        assert_eq!(config.timeout_secs, 30);

        assert!(BackendConfig::new("localhost:4242").is_err());
    }

    #[test]
    fn test_endpoint() {
        let config = BackendConfig::new("https://store.example.com").unwrap();
        assert_eq!(
            config.endpoint("/payment_intents"),
            "https://store.example.com/payment_intents"
        );
    }
}
