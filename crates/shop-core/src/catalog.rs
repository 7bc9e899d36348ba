//! # Catalog Types
//!
//! Products and SKUs as loaded from the payments backend.
//! The catalog is fetched once at startup and immutable afterwards,
//! except for lazy SKU attachment on products that arrive without pricing.

use crate::error::{ShopError, ShopResult};
use crate::money::{Currency, Price};
use serde::{Deserialize, Serialize};

/// A purchasable variant of a product, carrying its own price and currency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sku {
    /// Backend-assigned SKU identifier (e.g., "sku_increment")
    pub id: String,

    /// Unit price in smallest currency unit
    pub price: i64,

    /// Currency
    pub currency: Currency,

    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Sku {
    /// Create a new SKU
    pub fn new(id: impl Into<String>, price: i64, currency: Currency) -> Self {
        Self {
            id: id.into(),
            price,
            currency,
            description: None,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Unit price as a `Price`
    pub fn unit_price(&self) -> Price {
        Price::from_cents(self.price, self.currency)
    }
}

/// A product in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier (e.g., "increment")
    pub id: String,

    /// Display name
    pub name: String,

    /// Optional image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// SKUs for this product. May arrive empty from the product list
    /// endpoint and be attached by a follow-up fetch.
    #[serde(default)]
    pub skus: Vec<Sku>,
}

impl Product {
    /// Create a new product without pricing
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_url: None,
            skus: Vec::new(),
        }
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Builder: attach a SKU
    pub fn with_sku(mut self, sku: Sku) -> Self {
        self.skus.push(sku);
        self
    }

    /// Whether pricing data is already attached
    pub fn has_pricing(&self) -> bool {
        !self.skus.is_empty()
    }

    /// The SKU used for pricing. Multi-SKU selection is not supported;
    /// the first SKU is always the one sold.
    pub fn first_sku(&self) -> ShopResult<&Sku> {
        self.skus.first().ok_or_else(|| ShopError::MissingSku {
            product_id: self.id.clone(),
        })
    }
}

/// Product catalog (loaded from the backend)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Get number of products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
