//! Catalog Models

use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

/// Product image record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(default)]
    pub id: Option<u64>,

    pub image: String,
}

/// Product Model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: Decimal,

    /// Absolute discount amount, zero or absent when not on sale.
    #[serde(default)]
    pub discount: Option<Decimal>,

    #[serde(default)]
    pub about: Option<String>,

    #[serde(default)]
    pub desc: Option<String>,

    /// Identifier of the owning category.
    #[serde(default)]
    pub category: Option<u64>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub images: Vec<ProductImage>,

    #[serde(default)]
    pub created_at: Option<Timestamp>,

    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl Product {
    /// The price after applying the discount, floored at zero.
    #[must_use]
    pub fn sale_price(&self) -> Decimal {
        let discount = self.discount.unwrap_or_default();

        (self.price - discount).max(Decimal::ZERO)
    }

    /// Discount as a whole percentage of the price, `None` when the product
    /// is not discounted.
    #[must_use]
    pub fn discount_percentage(&self) -> Option<u32> {
        let discount = self.discount.unwrap_or_default();

        if discount <= Decimal::ZERO || self.price <= Decimal::ZERO {
            return None;
        }

        (discount / self.price * Decimal::ONE_HUNDRED).round().to_u32()
    }
}

/// Category Model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub title: String,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub created_at: Option<Timestamp>,

    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn product_deserializes_from_api_shape() -> TestResult {
        // Prices and discounts arrive as strings or numbers depending on
        // the endpoint; both must parse.
        let product: Product = serde_json::from_str(
            r#"{
                "id": 7,
                "title": "Desk Lamp",
                "price": "24.99",
                "discount": 5,
                "category": 2,
                "images": [{"id": 1, "image": "https://cdn.example/lamp.jpg"}],
                "created_at": "2025-11-02T09:30:00.000000Z",
                "updated_at": "2025-11-02T09:30:00.000000Z"
            }"#,
        )?;

        assert_eq!(product.id, 7);
        assert_eq!(product.price, Decimal::new(2499, 2));
        assert_eq!(product.sale_price(), Decimal::new(1999, 2));
        assert_eq!(product.discount_percentage(), Some(20));
        assert_eq!(product.images.len(), 1);

        Ok(())
    }

    #[test]
    fn undiscounted_product_has_no_percentage() -> TestResult {
        let product: Product =
            serde_json::from_str(r#"{"id": 1, "title": "Mug", "price": 8.0}"#)?;

        assert_eq!(product.discount_percentage(), None);
        assert_eq!(product.sale_price(), Decimal::new(80, 1));

        Ok(())
    }
}
