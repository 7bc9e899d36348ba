//! # Cart State
//!
//! Per-product quantity state and the line items derived from it.
//! Every product in the catalog has exactly one line item; quantities
//! default to 0 and are mutated only through `set_quantity`.

use crate::catalog::Catalog;
use crate::error::{ShopError, ShopResult};
use crate::money::{Currency, Price};
use serde::{Deserialize, Serialize};

/// A line item: the pairing of a product/SKU reference with a quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product ID
    pub product_id: String,

    /// SKU used for pricing (always the product's first SKU)
    pub sku_id: String,

    /// Product name (denormalized for display)
    pub name: String,

    /// Unit price
    pub unit_price: Price,

    /// Quantity
    pub quantity: u32,
}

impl LineItem {
    /// Calculate the total price for this line item
    pub fn total(&self) -> Price {
        Price {
            amount: self.unit_price.amount * self.quantity as i64,
            currency: self.unit_price.currency,
        }
    }
}

/// Parse a raw quantity input.
///
/// Empty or non-numeric input coerces to 0. Negative values clamp to 0
/// (quantities are non-negative by invariant).
pub fn parse_quantity(raw: &str) -> u32 {
    raw.trim()
        .parse::<i64>()
        .map(|n| n.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0)
}

/// In-memory cart: one line item per catalog product, in catalog order
#[derive(Debug, Clone)]
pub struct Cart {
    currency: Currency,
    items: Vec<LineItem>,
}

impl Cart {
    /// Build a cart from a loaded catalog, all quantities 0.
    ///
    /// Fails with `MissingSku` if any product has no pricing attached.
    pub fn from_catalog(catalog: &Catalog, currency: Currency) -> ShopResult<Self> {
        let items = catalog
            .products
            .iter()
            .map(|product| {
                let sku = product.first_sku()?;
                Ok(LineItem {
                    product_id: product.id.clone(),
                    sku_id: sku.id.clone(),
                    name: product.name.clone(),
                    unit_price: sku.unit_price(),
                    quantity: 0,
                })
            })
            .collect::<ShopResult<Vec<_>>>()?;

        Ok(Self { currency, items })
    }

    /// Set the quantity for a product
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> ShopResult<()> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| ShopError::ProductNotFound {
                product_id: product_id.to_string(),
            })?;
        item.quantity = quantity;
        Ok(())
    }

    /// Get the quantity for a product
    pub fn quantity(&self, product_id: &str) -> Option<u32> {
        self.items
            .iter()
            .find(|i| i.product_id == product_id)
            .map(|i| i.quantity)
    }

    /// Calculate the cart total (sum of `quantity × unit price`, minor units)
    pub fn total(&self) -> Price {
        let total_amount: i64 = self.items.iter().map(|item| item.total().amount).sum();
        Price {
            amount: total_amount,
            currency: self.currency,
        }
    }

    /// True if every line item has zero quantity
    pub fn is_all_zero(&self) -> bool {
        self.items.iter().all(|i| i.quantity == 0)
    }

    /// Line items, one per product
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Cart currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Take a display snapshot of the current state
    pub fn snapshot(&self) -> CartSnapshot {
        let total = self.total();
        CartSnapshot {
            total: total.amount,
            currency: self.currency,
            formatted_total: total.display(),
            pay_label: total.pay_label(),
            items: self.items.clone(),
        }
    }
}

/// Immutable view of the cart handed to presentation layers after
/// every mutation. The displayed total and the pay-button label are
/// derived here so they can never drift from the quantity state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSnapshot {
    /// Total in smallest currency unit
    pub total: i64,
    /// Currency
    pub currency: Currency,
    /// Total formatted for display ("$30.00")
    pub formatted_total: String,
    /// Submit button label ("Pay $30.00")
    pub pay_label: String,
    /// Line items at the time of the snapshot
    pub items: Vec<LineItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Product, Sku};

    fn demo_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add(
            Product::new("increment", "Increment Magazine")
                .with_sku(Sku::new("sku_increment", 399, Currency::USD)),
        );
        catalog.add(
            Product::new("shirt", "Shirt").with_sku(Sku::new("sku_shirt", 2500, Currency::USD)),
        );
        catalog
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity(" 12 "), 12);
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("abc"), 0);
        assert_eq!(parse_quantity("2.5"), 0);
        assert_eq!(parse_quantity("-3"), 0);
    }

    #[test]
    fn test_cart_starts_at_zero() {
        let cart = Cart::from_catalog(&demo_catalog(), Currency::USD).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert!(cart.is_all_zero());
        assert_eq!(cart.total().amount, 0);
        assert_eq!(cart.quantity("shirt"), Some(0));
    }

    #[test]
    fn test_total_is_sum_of_line_items() {
        let mut cart = Cart::from_catalog(&demo_catalog(), Currency::USD).unwrap();

        cart.set_quantity("increment", 3).unwrap();
        cart.set_quantity("shirt", 2).unwrap();

        // 3 × 399 + 2 × 2500
        assert_eq!(cart.total().amount, 6197);
        assert!(!cart.is_all_zero());
    }

    #[test]
    fn test_unknown_product() {
        let mut cart = Cart::from_catalog(&demo_catalog(), Currency::USD).unwrap();

        assert!(matches!(
            cart.set_quantity("mug", 1),
            Err(ShopError::ProductNotFound { .. })
        ));
    }

    #[test]
    fn test_snapshot_consistency() {
        let mut cart = Cart::from_catalog(&demo_catalog(), Currency::USD).unwrap();
        cart.set_quantity("shirt", 2).unwrap();

        let snapshot = cart.snapshot();
        assert_eq!(snapshot.total, 5000);
        assert_eq!(snapshot.formatted_total, "$50.00");
        assert_eq!(snapshot.pay_label, "Pay $50.00");
        assert_eq!(snapshot.items.len(), 2);
    }

    #[test]
    fn test_missing_sku_fails_cart_build() {
        let mut catalog = demo_catalog();
        catalog.add(Product::new("pins", "Pins"));

        assert!(matches!(
            Cart::from_catalog(&catalog, Currency::USD),
            Err(ShopError::MissingSku { .. })
        ));
    }
}
