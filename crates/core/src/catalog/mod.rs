//! Catalog listing pipeline: filter, sort, paginate.
//!
//! [`browse`] takes the full product list and a [`FilterSpec`] and returns the
//! page to render. The steps:
//!
//! 1. keep products that pass every active filter;
//! 2. if nothing is left, substitute a single [`ListingEntry::NoMatches`];
//! 3. stable-sort by the selected [`SortOrder`];
//! 4. `page_count = ceil(len / page_size)`, clamping the requested page;
//! 5. slice out the page.

pub mod filter;
pub mod sort;
pub mod source;

use std::num::NonZeroUsize;

pub use filter::{BaseFilter, FilterParams, FilterSpec, PriceRange};
pub use sort::{SortOrder, UnknownSortOrder};
pub use source::{Catalog, CatalogError};

use crate::types::Product;

/// One slot of a listing page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListingEntry<'a> {
    Product(&'a Product),
    /// Stands in for an empty result so the page renders a
    /// "no products match" message in place of a product card.
    NoMatches,
}

impl<'a> ListingEntry<'a> {
    /// The product, unless this is the no-matches placeholder.
    #[must_use]
    pub const fn product(&self) -> Option<&'a Product> {
        match self {
            Self::Product(product) => Some(product),
            Self::NoMatches => None,
        }
    }
}

/// A computed listing page.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<'a> {
    /// Products that passed the filters (0 when only the placeholder shows).
    pub filtered_total: usize,
    /// Number of pages; at least 1.
    pub page_count: usize,
    /// Zero-based page actually shown.
    pub current_page: usize,
    /// Entries on the current page.
    pub entries: Vec<ListingEntry<'a>>,
}

impl<'a> Listing<'a> {
    /// Whether the page is the no-matches placeholder.
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        self.filtered_total == 0
    }

    /// Products on the page, skipping the placeholder.
    pub fn products(&self) -> impl Iterator<Item = &'a Product> + '_ {
        self.entries.iter().filter_map(ListingEntry::product)
    }
}

/// Compute the listing page described by `spec`.
///
/// A requested page past the end is clamped to the last page.
#[must_use]
pub fn browse<'a>(
    products: &'a [Product],
    spec: &FilterSpec,
    page_size: NonZeroUsize,
) -> Listing<'a> {
    let mut matched: Vec<&Product> = products.iter().filter(|p| spec.matches(p)).collect();
    let filtered_total = matched.len();

    spec.sort.apply(&mut matched);

    let entries: Vec<ListingEntry<'a>> = if matched.is_empty() {
        vec![ListingEntry::NoMatches]
    } else {
        matched.into_iter().map(ListingEntry::Product).collect()
    };

    let page_size = page_size.get();
    let page_count = entries.len().div_ceil(page_size).max(1);
    let current_page = spec.page.min(page_count - 1);

    let entries = entries
        .into_iter()
        .skip(current_page * page_size)
        .take(page_size)
        .collect();

    Listing {
        filtered_total,
        page_count,
        current_page,
        entries,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::product::fixtures::product;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn catalog(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| product(&format!("p{i}"), i64::try_from(i).unwrap() + 1, 0))
            .collect()
    }

    #[test]
    fn test_page_count_is_ceiling() {
        let products = catalog(10);
        let listing = browse(&products, &FilterSpec::default(), size(3));
        assert_eq!(listing.filtered_total, 10);
        assert_eq!(listing.page_count, 4);
        assert_eq!(listing.entries.len(), 3);
    }

    #[test]
    fn test_pages_partition_the_result() {
        for total in [1, 5, 9, 10, 23] {
            for per_page in [1, 2, 3, 7, 50] {
                let products = catalog(total);
                let mut spec = FilterSpec::default();
                let first = browse(&products, &spec, size(per_page));
                assert_eq!(first.page_count, total.div_ceil(per_page));

                let mut seen = 0;
                for page in 0..first.page_count {
                    spec.set_page(page);
                    let listing = browse(&products, &spec, size(per_page));
                    assert_eq!(listing.current_page, page);
                    seen += listing.entries.len();
                }
                assert_eq!(seen, first.filtered_total);
            }
        }
    }

    #[test]
    fn test_last_page_is_partial() {
        let products = catalog(7);
        let mut spec = FilterSpec::default();
        spec.set_page(2);
        let listing = browse(&products, &spec, size(3));
        let ids: Vec<&str> = listing.products().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p6"]);
    }

    #[test]
    fn test_empty_result_yields_placeholder() {
        let products = catalog(4);
        let mut spec = FilterSpec::default();
        spec.toggle_brand("Leica");

        for per_page in [1, 3, 100] {
            let listing = browse(&products, &spec, size(per_page));
            assert_eq!(listing.filtered_total, 0);
            assert_eq!(listing.page_count, 1);
            assert_eq!(listing.entries, vec![ListingEntry::NoMatches]);
            assert!(listing.is_empty_result());
            assert_eq!(listing.products().count(), 0);
        }
    }

    #[test]
    fn test_empty_catalog_yields_placeholder() {
        let listing = browse(&[], &FilterSpec::default(), size(12));
        assert_eq!(listing.entries, vec![ListingEntry::NoMatches]);
        assert_eq!(listing.page_count, 1);
    }

    #[test]
    fn test_page_past_end_is_clamped() {
        let products = catalog(5);
        let mut spec = FilterSpec::default();
        spec.set_page(40);
        let listing = browse(&products, &spec, size(2));
        assert_eq!(listing.current_page, 2);
        assert_eq!(listing.entries.len(), 1);
    }

    #[test]
    fn test_brand_filter_scenario() {
        let mut products = catalog(5);
        for (i, p) in products.iter_mut().enumerate() {
            p.brand = if i % 2 == 0 { "Nikon" } else { "Canon" }.to_string();
        }
        let mut spec = FilterSpec::default();
        spec.toggle_brand("Canon");
        let listing = browse(&products, &spec, size(12));
        assert_eq!(listing.filtered_total, 2);
        assert!(listing.products().all(|p| p.brand == "Canon"));
    }

    #[test]
    fn test_best_selling_scenario() {
        let products = vec![product("A", 10, 5), product("B", 20, 50), product("C", 5, 1)];
        let mut spec = FilterSpec::default();
        spec.set_sort(SortOrder::BestSelling);
        let listing = browse(&products, &spec, size(12));
        let ids: Vec<&str> = listing.products().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["B", "A", "C"]);
    }

    #[test]
    fn test_filter_then_sort_then_slice() {
        let mut products = catalog(6);
        for p in &mut products {
            p.sale = p.price > Decimal::from(2);
        }
        let mut spec = FilterSpec::default();
        spec.toggle_sale_only();
        spec.set_sort(SortOrder::PriceHighToLow);
        let listing = browse(&products, &spec, size(2));
        let ids: Vec<&str> = listing.products().map(|p| p.id.as_str()).collect();
        assert_eq!(listing.filtered_total, 4);
        assert_eq!(ids, ["p5", "p4"]);
    }
}
