//! Cart Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::models::ProductImage;

/// Smallest orderable quantity for a single cart line.
pub const MIN_QUANTITY: u32 = 1;

/// Largest orderable quantity for a single cart line.
pub const MAX_QUANTITY: u32 = 99;

/// Clamp a requested quantity into the orderable range before it reaches
/// the network.
#[must_use]
pub fn clamp_quantity(quantity: u32) -> u32 {
    quantity.clamp(MIN_QUANTITY, MAX_QUANTITY)
}

/// Denormalized product snapshot carried on a cart line so the line renders
/// without a second fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: u64,
    pub title: String,
    pub price: Decimal,

    #[serde(default)]
    pub discount: Option<Decimal>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub images: Vec<ProductImage>,
}

/// One product line in the cart, distinct from the product it references.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    pub id: u64,
    pub product_id: u64,
    pub quantity: u32,

    /// Unit price snapshotted at add time; may diverge from the current
    /// catalog price.
    #[serde(rename = "price")]
    pub unit_price: Decimal,

    pub product: ProductSnapshot,
}

/// Server-computed aggregates. The client trusts these as-is and never
/// recomputes them from the item list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartSummary {
    #[serde(default)]
    pub subtotal: Decimal,

    /// Total units across all lines.
    #[serde(default, alias = "item_count", alias = "itemCount")]
    pub total_items: u32,
}

/// Cart body carried in the `data` field of every cart endpoint response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartPayload {
    #[serde(default)]
    pub items: Vec<CartItem>,

    #[serde(default)]
    pub summary: CartSummary,
}

/// Body of `GET /cart/count`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CartCount {
    pub count: u32,
}

/// The client-held snapshot of the server-owned cart.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    /// Lines in server-returned order; never reordered client-side.
    pub items: Vec<CartItem>,

    pub summary: CartSummary,

    /// True while a fetch or mutation is in flight.
    pub loading: bool,

    /// Last failure as a displayable message; cleared by the next
    /// successful operation.
    pub error: Option<String>,
}

impl CartState {
    /// The pre-load, logged-out, and post-clear state.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn quantities_clamp_into_range() {
        assert_eq!(clamp_quantity(0), 1);
        assert_eq!(clamp_quantity(1), 1);
        assert_eq!(clamp_quantity(42), 42);
        assert_eq!(clamp_quantity(99), 99);
        assert_eq!(clamp_quantity(250), 99);
    }

    #[test]
    fn payload_deserializes_from_cart_response() -> TestResult {
        let payload: CartPayload = serde_json::from_str(
            r#"{
                "items": [{
                    "id": 11,
                    "product_id": 42,
                    "quantity": 2,
                    "price": "19.99",
                    "product": {
                        "id": 42,
                        "title": "Desk Lamp",
                        "price": 21.50,
                        "images": [{"image": "https://cdn.example/lamp.jpg"}]
                    }
                }],
                "summary": {"subtotal": "39.98", "item_count": 2}
            }"#,
        )?;

        let item = payload.items.first().expect("payload should have one item");

        assert_eq!(item.product_id, 42);
        assert_eq!(item.unit_price, Decimal::new(1999, 2));
        assert_eq!(payload.summary.subtotal, Decimal::new(3998, 2));
        assert_eq!(payload.summary.total_items, 2);

        Ok(())
    }

    #[test]
    fn missing_summary_defaults_to_empty() -> TestResult {
        let payload: CartPayload = serde_json::from_str(r#"{"items": []}"#)?;

        assert_eq!(payload.summary.subtotal, Decimal::ZERO);
        assert_eq!(payload.summary.total_items, 0);

        Ok(())
    }
}
