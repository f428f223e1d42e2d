//! Product documents as returned by the content platform.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::Price;

/// A catalog product.
///
/// Field names follow the content platform's projection (`_id`, `imageUrl`,
/// ...). Records are taken verbatim; nothing is validated beyond parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Content document ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Document creation time, used by the "newest" sort.
    #[serde(rename = "_createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Product name.
    pub name: String,
    /// URL key (`/products/{slug}`).
    #[serde(default)]
    pub slug: String,
    /// Price in the store currency.
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Decimal,
    /// Free-form category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Name of the selling shop as shown to shoppers.
    #[serde(default)]
    pub shop_name: Option<String>,
    /// Slug of the owning tenant, when the document references one.
    #[serde(default)]
    pub shop: Option<String>,
    /// External image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Availability flag. Missing means in stock.
    #[serde(default = "default_in_stock", deserialize_with = "deserialize_in_stock")]
    pub in_stock: bool,
    /// Units on hand, when tracked.
    #[serde(default)]
    pub stock_quantity: Option<i64>,
}

impl Product {
    /// The product price in the default currency.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// Whether the product belongs to the tenant with the given slug.
    #[must_use]
    pub fn belongs_to(&self, tenant_slug: &str) -> bool {
        self.shop.as_deref() == Some(tenant_slug)
    }
}

const fn default_in_stock() -> bool {
    true
}

/// Documents may carry `"inStock": null`; treat it like a missing field.
fn deserialize_in_stock<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Parse a JSON number through its textual form so `19.99` stays exactly `19.99`.
fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let text = number.to_string();
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(&text).map_err(serde::de::Error::custom)
    } else {
        Decimal::from_str(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_document() {
        let json = r#"{
            "_id": "prod-1",
            "_createdAt": "2025-03-01T10:00:00Z",
            "name": "Linen Shirt",
            "slug": "linen-shirt",
            "price": 49.99,
            "category": "Apparel",
            "shopName": "Demo Store",
            "shop": "demo-store",
            "imageUrl": "https://cdn.example.com/shirt.jpg",
            "description": "Breathable.",
            "inStock": false,
            "stockQuantity": 0
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "prod-1");
        assert_eq!(product.price, Decimal::new(4999, 2));
        assert_eq!(product.category.as_deref(), Some("Apparel"));
        assert!(product.belongs_to("demo-store"));
        assert!(!product.in_stock);
        assert!(product.created_at.is_some());
    }

    #[test]
    fn test_deserialize_sparse_document() {
        let json = r#"{"_id": "p", "name": "Mug", "price": 12, "inStock": null}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.in_stock);
        assert!(product.category.is_none());
        assert!(product.created_at.is_none());
        assert_eq!(product.unit_price().display(), "$12.00");
    }

    #[test]
    fn test_deserialize_rejects_string_price() {
        let json = r#"{"_id": "p", "name": "Mug", "price": "twelve"}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}
