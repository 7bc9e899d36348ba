//! # shop-wasm
//!
//! WebAssembly bindings for checkout-rs.
//!
//! This crate exposes the cart math to a browser page so the checkout
//! widget can run the same reconciliation logic client-side:
//! - Line-item totals and cart totals
//! - Quantity input parsing (empty/invalid → 0)
//! - Amount formatting for the total display and pay-button label
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { cart_total, format_amount, pay_label } from 'shop-wasm';
//!
//! await init();
//!
//! const total = cart_total([
//!   { sku_id: 'sku_increment', name: 'Increment', price: 399, currency: 'usd', quantity: 3 }
//! ]);
//!
//! payButton.textContent = pay_label(total, 'usd');
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use serde::{Deserialize, Serialize};
use shop_core::{Currency, Price};
use wasm_bindgen::prelude::*;

/// Cart line item for the WASM interface
#[derive(Debug, Serialize, Deserialize)]
#[wasm_bindgen]
pub struct WasmLineItem {
    sku_id: String,
    name: String,
    price: i64,
    currency: String,
    quantity: u32,
}

#[wasm_bindgen]
impl WasmLineItem {
    #[wasm_bindgen(constructor)]
    pub fn new(sku_id: String, name: String, price: i64, currency: String, quantity: u32) -> Self {
        Self {
            sku_id,
            name,
            price,
            currency,
            quantity,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn sku_id(&self) -> String {
        self.sku_id.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn price(&self) -> i64 {
        self.price
    }

    #[wasm_bindgen(getter)]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Line total in minor units
    #[wasm_bindgen]
    pub fn total(&self) -> i64 {
        self.price * self.quantity as i64
    }

    /// Format the line total for display
    #[wasm_bindgen]
    pub fn format_total(&self) -> String {
        format_amount(self.total(), &self.currency)
    }
}

fn currency_or_default(code: &str) -> Currency {
    Currency::from_code(code).unwrap_or_default()
}

/// Calculate the cart total over a list of line items (minor units)
#[wasm_bindgen]
pub fn cart_total(items: JsValue) -> Result<i64, JsValue> {
    let items: Vec<WasmLineItem> = serde_wasm_bindgen::from_value(items)
        .map_err(|e| JsValue::from_str(&format!("Invalid cart items: {}", e)))?;

    Ok(items.iter().map(|item| item.total()).sum())
}

/// Parse a raw quantity input: empty/non-numeric → 0, negative clamps to 0
#[wasm_bindgen]
pub fn parse_quantity(raw: &str) -> u32 {
    shop_core::parse_quantity(raw)
}

/// Format an amount in minor units for display ("$30.00")
#[wasm_bindgen]
pub fn format_amount(amount: i64, currency: &str) -> String {
    Price::from_cents(amount, currency_or_default(currency)).display()
}

/// The submit-button label for an amount ("Pay $30.00")
#[wasm_bindgen]
pub fn pay_label(amount: i64, currency: &str) -> String {
    Price::from_cents(amount, currency_or_default(currency)).pay_label()
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_total() {
        let item = WasmLineItem::new(
            "sku_increment".to_string(),
            "Increment Magazine".to_string(),
            399,
            "usd".to_string(),
            3,
        );
        assert_eq!(item.total(), 1197);
        assert_eq!(item.format_total(), "$11.97");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(3000, "usd"), "$30.00");
        assert_eq!(format_amount(1999, "eur"), "€19.99");
        assert_eq!(format_amount(1000, "jpy"), "¥1000");
        // Unknown currency falls back to USD
        assert_eq!(format_amount(100, "xxx"), "$1.00");
    }

    #[test]
    fn test_pay_label() {
        assert_eq!(pay_label(3000, "usd"), "Pay $30.00");
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("-1"), 0);
    }
}
