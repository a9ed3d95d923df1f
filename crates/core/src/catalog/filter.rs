//! Listing filter state.
//!
//! A [`FilterSpec`] is built per listing view and never persisted. Each
//! dimension is independent state; changing any of them sends the shopper
//! back to the first page.

use rust_decimal::Decimal;

use super::sort::SortOrder;
use crate::types::Product;

/// Filters fixed by how the shopper reached the listing (navigation links).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseFilter {
    pub gender: Option<String>,
    pub category: Option<String>,
    /// Initial product type; seeds [`FilterSpec::kind`].
    pub kind: Option<String>,
}

/// Inclusive price bounds.
///
/// The default `0..=100` doubles as "no price filter": while the range is at
/// the default, products priced outside it are still listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    /// Lower bound of the default range.
    pub const DEFAULT_MIN: Decimal = Decimal::ZERO;
    /// Upper bound of the default range.
    pub const DEFAULT_MAX: Decimal = Decimal::ONE_HUNDRED;

    #[must_use]
    pub const fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// Whether the range is still the default (and therefore inactive).
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.min == Self::DEFAULT_MIN && self.max == Self::DEFAULT_MAX
    }

    /// Whether `price` lies within the bounds, both inclusive.
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }
}

/// Everything that decides which products a listing shows and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub base: BaseFilter,
    pub sale_only: bool,
    pub sort: SortOrder,
    pub kind: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub price: PriceRange,
    pub page: usize,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::new(BaseFilter::default())
    }
}

/// Clear the slot if it already holds `value`, otherwise select `value`.
fn toggle(slot: &mut Option<String>, value: &str) {
    if slot.as_deref() == Some(value) {
        *slot = None;
    } else {
        *slot = Some(value.to_owned());
    }
}

impl FilterSpec {
    /// Fresh filters for a listing reached through `base`.
    #[must_use]
    pub fn new(base: BaseFilter) -> Self {
        let kind = base.kind.clone();
        Self {
            base,
            sale_only: false,
            sort: SortOrder::None,
            kind,
            size: None,
            color: None,
            brand: None,
            price: PriceRange::default(),
            page: 0,
        }
    }

    pub fn toggle_sale_only(&mut self) {
        self.sale_only = !self.sale_only;
        self.page = 0;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.page = 0;
    }

    /// Select a product type, or clear it if it is the active one.
    ///
    /// The selection replaces the type the listing was reached with.
    pub fn toggle_kind(&mut self, kind: &str) {
        toggle(&mut self.kind, kind);
        self.page = 0;
    }

    pub fn toggle_size(&mut self, size: &str) {
        toggle(&mut self.size, size);
        self.page = 0;
    }

    pub fn toggle_color(&mut self, color: &str) {
        toggle(&mut self.color, color);
        self.page = 0;
    }

    pub fn toggle_brand(&mut self, brand: &str) {
        toggle(&mut self.brand, brand);
        self.page = 0;
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        self.price = range;
        self.page = 0;
    }

    pub const fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Drop every user choice, including the type and the sort order.
    pub fn clear_all(&mut self) {
        self.sale_only = false;
        self.sort = SortOrder::None;
        self.kind = None;
        self.size = None;
        self.color = None;
        self.brand = None;
        self.price = PriceRange::default();
        self.page = 0;
    }

    /// Whether any of the clearable categorical filters is set.
    #[must_use]
    pub const fn has_selection(&self) -> bool {
        self.kind.is_some() || self.size.is_some() || self.color.is_some() || self.brand.is_some()
    }

    /// Whether the product passes every active filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let eq = |wanted: &Option<String>, actual: &str| {
            wanted.as_deref().is_none_or(|wanted| wanted == actual)
        };

        (!self.sale_only || product.sale)
            && eq(&self.base.gender, &product.gender)
            && eq(&self.base.category, &product.category)
            && eq(&self.kind, &product.kind)
            && self.size.as_deref().is_none_or(|size| product.has_size(size))
            && self.color.as_deref().is_none_or(|color| product.has_color(color))
            && eq(&self.brand, &product.brand)
            && (self.price.is_default() || self.price.contains(product.price))
    }

    /// Rebuild the filter state a front end received as loose parameters.
    ///
    /// Blank strings count as absent, except for `kind` where `Some("")`
    /// clears the type seeded from the base. Missing price bounds take the
    /// default, swapped bounds are reordered, and the one-based page becomes
    /// zero-based.
    #[must_use]
    pub fn from_params(params: FilterParams) -> Self {
        let FilterParams {
            base,
            kind,
            size,
            color,
            brand,
            sale_only,
            sort,
            min,
            max,
            page,
        } = params;

        let mut spec = Self::new(BaseFilter {
            gender: non_blank(base.gender),
            category: non_blank(base.category),
            kind: non_blank(base.kind),
        });
        if let Some(kind) = kind {
            spec.kind = non_blank(Some(kind));
        }
        spec.size = non_blank(size);
        spec.color = non_blank(color);
        spec.brand = non_blank(brand);
        spec.sale_only = sale_only;
        spec.sort = sort;

        let min = min.unwrap_or(PriceRange::DEFAULT_MIN);
        let max = max.unwrap_or(PriceRange::DEFAULT_MAX);
        spec.price = PriceRange::new(min.min(max), min.max(max));
        spec.page = page.saturating_sub(1);
        spec
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Listing parameters before normalisation, as carried by a query string or
/// command line. See [`FilterSpec::from_params`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub base: BaseFilter,
    /// Explicit type choice; `None` keeps the base type.
    pub kind: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub sale_only: bool,
    pub sort: SortOrder,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    /// One-based page number; 0 reads as the first page.
    pub page: usize,
}
