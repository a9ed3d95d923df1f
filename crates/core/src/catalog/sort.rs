//! Listing sort orders.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Product;

/// How a listing is ordered. Every order is stable for equal keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    #[serde(rename = "")]
    None,
    /// Most units sold first.
    #[serde(rename = "soldQuantityHighToLow")]
    BestSelling,
    /// Largest discount percentage first.
    #[serde(rename = "discountHighToLow")]
    BestDiscount,
    #[serde(rename = "priceHighToLow")]
    PriceHighToLow,
    #[serde(rename = "priceLowToHigh")]
    PriceLowToHigh,
}

/// Unknown sort name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order: {0}")]
pub struct UnknownSortOrder(pub String);

impl SortOrder {
    /// Every order, in menu order.
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::BestSelling,
        Self::BestDiscount,
        Self::PriceHighToLow,
        Self::PriceLowToHigh,
    ];

    /// Wire name used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::BestSelling => "soldQuantityHighToLow",
            Self::BestDiscount => "discountHighToLow",
            Self::PriceHighToLow => "priceHighToLow",
            Self::PriceLowToHigh => "priceLowToHigh",
        }
    }

    /// Human label for menus.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "Sorting",
            Self::BestSelling => "Best Selling",
            Self::BestDiscount => "Best Discount",
            Self::PriceHighToLow => "Price High To Low",
            Self::PriceLowToHigh => "Price Low To High",
        }
    }

    /// Sort products in place. `None` leaves the order untouched.
    pub fn apply(self, products: &mut [&Product]) {
        match self {
            Self::None => {}
            Self::BestSelling => products.sort_by_key(|p| Reverse(p.sold)),
            Self::BestDiscount => products.sort_by_key(|p| Reverse(p.discount_percent())),
            Self::PriceHighToLow => products.sort_by(|a, b| b.price.cmp(&a.price)),
            Self::PriceLowToHigh => products.sort_by(|a, b| a.price.cmp(&b.price)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| UnknownSortOrder(s.to_string()))
    }
}
