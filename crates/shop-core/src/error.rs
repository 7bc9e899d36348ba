//! # Shop Error Types
//!
//! Typed error handling for the checkout engine.
//! All fallible operations return `Result<T, ShopError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration errors (missing env vars, controller not bootstrapped)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend returned no products; the store cannot proceed
    #[error("Catalog is empty")]
    EmptyCatalog,

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Product has no SKU attached, so it cannot be priced
    #[error("No SKU for product: {product_id}")]
    MissingSku { product_id: String },

    /// Business error reported by the payments backend (`error` field in payload)
    #[error("Gateway error: {message}")]
    Gateway { message: String },

    /// Network/HTTP error communicating with the backend
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ShopError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ShopError::NetworkError(_) | ShopError::Gateway { .. }
        )
    }

    /// Returns true if this error is fatal at startup
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ShopError::EmptyCatalog | ShopError::Configuration(_)
        )
    }
}

/// Result type alias for checkout operations
pub type ShopResult<T> = Result<T, ShopError>;
