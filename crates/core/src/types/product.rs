//! Catalog product model.
//!
//! Products arrive whole from the catalog source (a JSON document in the
//! source's camelCase layout) and are never mutated by the storefront.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product as supplied by the catalog source.
///
/// `price <= origin_price` and `sold <= quantity` are expected but not
/// enforced; see [`Product::anomalies`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub gender: String,
    #[serde(rename = "new", default)]
    pub is_new: bool,
    #[serde(default)]
    pub sale: bool,
    #[serde(default)]
    pub rate: f32,
    pub price: Decimal,
    pub origin_price: Decimal,
    pub brand: String,
    #[serde(default)]
    pub sold: u32,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub quantity_purchase: u32,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub variation: Vec<Variation>,
    #[serde(default)]
    pub thumb_image: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub slug: String,
}

/// A color variation of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub color: String,
    pub color_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A trust violation found in catalog data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// Current price is above the original price.
    PriceAboveOrigin,
    /// More units sold than were ever stocked.
    SoldAboveQuantity,
    /// The size list names the same size twice.
    DuplicateSize(String),
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PriceAboveOrigin => f.write_str("price is above origin price"),
            Self::SoldAboveQuantity => f.write_str("sold count is above quantity"),
            Self::DuplicateSize(size) => write!(f, "size {size:?} listed more than once"),
        }
    }
}

impl Product {
    /// Whole-percent discount off the original price, rounded down.
    ///
    /// Returns 0 when the original price is zero.
    #[must_use]
    pub fn discount_percent(&self) -> i64 {
        self.price
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(self.origin_price))
            .map_or(0, |ratio| {
                (Decimal::ONE_HUNDRED - ratio)
                    .floor()
                    .to_i64()
                    .unwrap_or(0)
            })
    }

    /// Whole-percent share of stock already sold, rounded down.
    #[must_use]
    pub fn sold_percent(&self) -> u32 {
        if self.quantity == 0 {
            return 0;
        }
        let percent = u64::from(self.sold) * 100 / u64::from(self.quantity);
        u32::try_from(percent).unwrap_or(u32::MAX)
    }

    /// Whether any variation carries the given color.
    #[must_use]
    pub fn has_color(&self, color: &str) -> bool {
        self.variation.iter().any(|v| v.color == color)
    }

    /// Whether the size list contains the given size.
    #[must_use]
    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    /// First thumbnail, falling back to the first gallery image.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumb_image
            .first()
            .or_else(|| self.images.first())
            .map(String::as_str)
    }

    /// List the catalog invariants this product breaks.
    #[must_use]
    pub fn anomalies(&self) -> Vec<Anomaly> {
        let mut found = Vec::new();
        if self.price > self.origin_price {
            found.push(Anomaly::PriceAboveOrigin);
        }
        if self.sold > self.quantity {
            found.push(Anomaly::SoldAboveQuantity);
        }
        for (i, size) in self.sizes.iter().enumerate() {
            if self.sizes.iter().take(i).any(|earlier| earlier == size) {
                found.push(Anomaly::DuplicateSize(size.clone()));
            }
        }
        found
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use rust_decimal::Decimal;

    use super::{Product, Variation};
    use crate::ProductId;

    /// Minimal product used across the crate's tests.
    pub fn product(id: &str, price: i64, sold: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            category: "camera".to_string(),
            kind: "Lenses".to_string(),
            gender: "unisex".to_string(),
            is_new: false,
            sale: false,
            rate: 4.0,
            price: Decimal::from(price),
            origin_price: Decimal::from(price),
            brand: "Canon".to_string(),
            sold,
            quantity: 100,
            quantity_purchase: 1,
            sizes: Vec::new(),
            variation: Vec::new(),
            thumb_image: Vec::new(),
            images: Vec::new(),
            description: String::new(),
            action: String::new(),
            slug: id.to_string(),
        }
    }

    pub fn variation(color: &str) -> Variation {
        Variation {
            color: color.to_string(),
            color_code: format!("#{color}"),
            color_image: None,
            image: None,
        }
    }
}
