//! Product listing route handler.
//!
//! The whole filter state lives in the query string, so every sidebar entry,
//! chip and page number is a plain link to `/shop` with one change applied.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use shutterbay_core::catalog::{
    BaseFilter, FilterParams, FilterSpec, Listing, PriceRange, SortOrder, browse,
};
use shutterbay_core::collections::Stores;
use shutterbay_core::Product;
use tracing::instrument;
use url::form_urlencoded;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{NavCounts, Shopper};
use crate::state::AppState;

/// Product types offered in the sidebar.
pub const PRODUCT_TYPES: [&str; 21] = [
    "DSLR Cameras",
    "Mirrorless Cameras",
    "Lenses",
    "Tripods",
    "Camera Bags",
    "Lighting",
    "Camera Accessories",
    "Memory Cards",
    "Studio Equipment",
    "Gimbals",
    "Filters",
    "Monitors",
    "Flash Drives",
    "Camera Straps",
    "Microphones",
    "Headphones",
    "Camera Drones",
    "Action Cameras",
    "Camera Stabilizers",
    "External Flash",
    "Battery Grips",
];

/// Memory card sizes offered in the sidebar.
pub const CARD_SIZES: [&str; 6] = ["32GB", "64GB", "128GB", "256GB", "512GB", "4K Card"];

/// Lens mounts, keyed by the variation color that encodes them.
pub const LENS_MOUNTS: [(&str, &str); 7] = [
    ("pink", "Canon EF / EF-S"),
    ("red", "Nikon F-mount"),
    ("green", "Sony E-mount"),
    ("yellow", "Micro Four Thirds"),
    ("purple", "Leica L-mount"),
    ("black", "Sigma L-mount"),
    ("white", ""),
];

/// Brands offered in the sidebar.
pub const BRANDS: [&str; 7] = [
    "Canon",
    "Nikon",
    "Sony",
    "Fujifilm",
    "Panasonic",
    "Leica",
    "Olympus",
];

// =============================================================================
// Query
// =============================================================================

/// Listing query parameters.
///
/// `gender`, `category` and `type` are the navigation filters. `kind` is the
/// shopper's own type choice: absent means "same as `type`", empty means
/// "no type".
#[derive(Debug, Default, Deserialize)]
pub struct ShopQuery {
    pub gender: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub base_type: Option<String>,
    pub kind: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub sale: Option<String>,
    pub sort: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    /// One-based page number.
    pub page: Option<usize>,
}

fn parse_price(name: &str, raw: Option<String>) -> Result<Option<Decimal>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<Decimal>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("invalid {name} price: {raw}"))),
    }
}

impl ShopQuery {
    /// Rebuild the filter state described by the query.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] for an unknown sort order or a
    /// non-numeric price bound.
    pub fn into_spec(self) -> Result<FilterSpec> {
        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => SortOrder::None,
            Some(sort) => sort
                .parse::<SortOrder>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?,
        };

        Ok(FilterSpec::from_params(FilterParams {
            base: BaseFilter {
                gender: self.gender,
                category: self.category,
                kind: self.base_type,
            },
            kind: self.kind,
            size: self.size,
            color: self.color,
            brand: self.brand,
            sale_only: self
                .sale
                .is_some_and(|sale| sale == "1" || sale.eq_ignore_ascii_case("true")),
            sort,
            min: parse_price("min", self.min)?,
            max: parse_price("max", self.max)?,
            page: self.page.unwrap_or(1),
        }))
    }
}

/// Query pairs that reproduce `spec`, in a stable order.
fn query_pairs(spec: &FilterSpec) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    let base = &spec.base;
    let optional = [
        ("gender", &base.gender),
        ("category", &base.category),
        ("type", &base.kind),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            pairs.push((name, value.clone()));
        }
    }
    if spec.kind != base.kind {
        pairs.push(("kind", spec.kind.clone().unwrap_or_default()));
    }
    let selections = [
        ("size", &spec.size),
        ("color", &spec.color),
        ("brand", &spec.brand),
    ];
    for (name, value) in selections {
        if let Some(value) = value {
            pairs.push((name, value.clone()));
        }
    }
    if spec.sale_only {
        pairs.push(("sale", "1".to_string()));
    }
    if spec.sort != SortOrder::None {
        pairs.push(("sort", spec.sort.as_str().to_string()));
    }
    if !spec.price.is_default() {
        pairs.push(("min", spec.price.min.to_string()));
        pairs.push(("max", spec.price.max.to_string()));
    }
    if spec.page > 0 {
        pairs.push(("page", (spec.page + 1).to_string()));
    }
    pairs
}

/// Link to the listing showing `spec`.
#[must_use]
pub fn listing_href(spec: &FilterSpec) -> String {
    let pairs = query_pairs(spec);
    if pairs.is_empty() {
        return "/shop".to_string();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("/shop?{query}")
}

/// Link to the listing after applying `change` to a copy of `spec`.
fn href_with(spec: &FilterSpec, change: impl FnOnce(&mut FilterSpec)) -> String {
    let mut next = spec.clone();
    change(&mut next);
    listing_href(&next)
}

// =============================================================================
// Views
// =============================================================================

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub kind: String,
    pub thumbnail: Option<String>,
    pub price: Decimal,
    /// Original price, when the product is discounted.
    pub origin_price: Option<Decimal>,
    pub discount: i64,
    pub sold: u32,
    pub available: u32,
    pub sold_percent: u32,
    pub rate: f32,
    pub is_new: bool,
    pub sale: bool,
    pub swatches: Vec<String>,
    pub in_wishlist: bool,
    pub in_compare: bool,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, stores: &Stores) -> Self {
        let discount = product.discount_percent();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            kind: product.kind.clone(),
            thumbnail: product.thumbnail().map(str::to_owned),
            price: product.price,
            origin_price: (discount > 0).then_some(product.origin_price),
            discount,
            sold: product.sold,
            available: product.quantity.saturating_sub(product.sold),
            sold_percent: product.sold_percent(),
            rate: product.rate,
            is_new: product.is_new,
            sale: product.sale,
            swatches: product
                .variation
                .iter()
                .map(|v| v.color_code.clone())
                .collect(),
            in_wishlist: stores.wishlist.contains(&product.id),
            in_compare: stores.compare.contains(&product.id),
        }
    }
}

/// A sidebar option or menu entry.
#[derive(Clone)]
pub struct FilterLink {
    pub label: String,
    pub value: String,
    pub href: String,
    pub active: bool,
}

/// A removable chip for an active selection.
#[derive(Clone)]
pub struct Chip {
    pub label: String,
    pub href: String,
}

/// A page number link.
#[derive(Clone)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

fn option_links<'a>(
    spec: &FilterSpec,
    options: impl IntoIterator<Item = (&'a str, &'a str)>,
    current: &Option<String>,
    toggle: fn(&mut FilterSpec, &str),
) -> Vec<FilterLink> {
    options
        .into_iter()
        .map(|(value, label)| FilterLink {
            label: label.to_string(),
            value: value.to_string(),
            href: href_with(spec, |s| toggle(s, value)),
            active: current.as_deref() == Some(value),
        })
        .collect()
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopTemplate {
    pub nav: NavCounts,
    pub cards: Vec<ProductCard>,
    pub no_matches: bool,
    pub filtered_total: usize,
    pub page_count: usize,
    pub pages: Vec<PageLink>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub types: Vec<FilterLink>,
    pub sizes: Vec<FilterLink>,
    pub mounts: Vec<FilterLink>,
    pub brands: Vec<FilterLink>,
    pub sorts: Vec<FilterLink>,
    pub sort_label: &'static str,
    pub sale_href: String,
    pub sale_only: bool,
    pub chips: Vec<Chip>,
    pub clear_href: Option<String>,
    pub price_min: Decimal,
    pub price_max: Decimal,
    /// Hidden fields that carry the rest of the state through the price form.
    pub price_fields: Vec<(String, String)>,
    pub return_to: String,
}

impl ShopTemplate {
    #[must_use]
    pub fn new(spec: &FilterSpec, listing: &Listing<'_>, shopper: &Shopper) -> Self {
        let mut shown = spec.clone();
        shown.set_page(listing.current_page);

        let pages = if listing.page_count > 1 {
            (0..listing.page_count)
                .map(|page| PageLink {
                    number: page + 1,
                    href: href_with(&shown, |s| s.set_page(page)),
                    current: page == listing.current_page,
                })
                .collect()
        } else {
            Vec::new()
        };
        let prev_href = (listing.current_page > 0)
            .then(|| href_with(&shown, |s| s.set_page(listing.current_page - 1)));
        let next_href = (listing.current_page + 1 < listing.page_count)
            .then(|| href_with(&shown, |s| s.set_page(listing.current_page + 1)));

        let mut chips = Vec::new();
        if let Some(kind) = &spec.kind {
            chips.push(Chip {
                label: kind.clone(),
                href: href_with(spec, |s| s.toggle_kind(kind)),
            });
        }
        if let Some(size) = &spec.size {
            chips.push(Chip {
                label: size.clone(),
                href: href_with(spec, |s| s.toggle_size(size)),
            });
        }
        if let Some(color) = &spec.color {
            chips.push(Chip {
                label: color.clone(),
                href: href_with(spec, |s| s.toggle_color(color)),
            });
        }
        if let Some(brand) = &spec.brand {
            chips.push(Chip {
                label: brand.clone(),
                href: href_with(spec, |s| s.toggle_brand(brand)),
            });
        }

        let price_fields = query_pairs(&FilterSpec {
            price: PriceRange::default(),
            page: 0,
            ..spec.clone()
        })
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

        Self {
            nav: shopper.nav(),
            cards: listing
                .products()
                .map(|p| ProductCard::new(p, &shopper.stores))
                .collect(),
            no_matches: listing.is_empty_result(),
            filtered_total: listing.filtered_total,
            page_count: listing.page_count,
            pages,
            prev_href,
            next_href,
            types: option_links(
                spec,
                PRODUCT_TYPES.iter().map(|t| (*t, *t)),
                &spec.kind,
                FilterSpec::toggle_kind,
            ),
            sizes: option_links(
                spec,
                CARD_SIZES.iter().map(|s| (*s, *s)),
                &spec.size,
                FilterSpec::toggle_size,
            ),
            mounts: option_links(
                spec,
                LENS_MOUNTS.iter().copied(),
                &spec.color,
                FilterSpec::toggle_color,
            ),
            brands: option_links(
                spec,
                BRANDS.iter().map(|b| (*b, *b)),
                &spec.brand,
                FilterSpec::toggle_brand,
            ),
            sorts: SortOrder::ALL
                .into_iter()
                .filter(|order| *order != SortOrder::None)
                .map(|order| FilterLink {
                    label: order.label().to_string(),
                    value: order.as_str().to_string(),
                    href: href_with(spec, |s| s.set_sort(order)),
                    active: spec.sort == order,
                })
                .collect(),
            sort_label: spec.sort.label(),
            sale_href: href_with(spec, FilterSpec::toggle_sale_only),
            sale_only: spec.sale_only,
            chips,
            clear_href: spec
                .has_selection()
                .then(|| href_with(spec, FilterSpec::clear_all)),
            price_min: spec.price.min,
            price_max: spec.price.max,
            price_fields,
            return_to: listing_href(&shown),
        }
    }
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Display the product listing.
#[instrument(skip(state, shopper))]
pub async fn index(
    State(state): State<AppState>,
    shopper: Shopper,
    Query(query): Query<ShopQuery>,
) -> Result<ShopTemplate> {
    let spec = query.into_spec()?;
    let listing = browse(
        state.catalog().products(),
        &spec,
        state.config().products_per_page,
    );
    tracing::debug!(
        filtered_total = listing.filtered_total,
        page = listing.current_page,
        "Listing computed"
    );
    Ok(ShopTemplate::new(&spec, &listing, &shopper))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(query: &str) -> FilterSpec {
        let query: ShopQuery = query_from(query);
        query.into_spec().unwrap()
    }

    fn query_from(query: &str) -> ShopQuery {
        let uri: axum::http::Uri = format!("/shop?{query}").parse().unwrap();
        Query::<ShopQuery>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn test_empty_query_is_default_spec() {
        assert_eq!(parse(""), FilterSpec::default());
        assert_eq!(listing_href(&FilterSpec::default()), "/shop");
    }

    #[test]
    fn test_href_round_trips_through_query() {
        let mut spec = FilterSpec::new(BaseFilter {
            gender: Some("unisex".to_string()),
            category: Some("camera".to_string()),
            kind: Some("Lenses".to_string()),
        });
        spec.toggle_brand("Canon");
        spec.toggle_color("pink");
        spec.toggle_sale_only();
        spec.set_sort(SortOrder::PriceLowToHigh);
        spec.set_price_range(PriceRange::new(Decimal::from(5), Decimal::from(80)));
        spec.set_page(3);

        let href = listing_href(&spec);
        let query = href.strip_prefix("/shop?").unwrap();
        assert_eq!(parse(query), spec);
    }

    #[test]
    fn test_cleared_base_type_is_kept_in_href() {
        let mut spec = FilterSpec::new(BaseFilter {
            kind: Some("Lenses".to_string()),
            ..BaseFilter::default()
        });
        spec.toggle_kind("Lenses");
        assert_eq!(spec.kind, None);

        let href = listing_href(&spec);
        assert!(href.contains("kind=&") || href.ends_with("kind="));
        let query = href.strip_prefix("/shop?").unwrap();
        assert_eq!(parse(query).kind, None);
    }

    #[test]
    fn test_unknown_sort_is_bad_request() {
        let query = query_from("sort=cheapest");
        assert!(matches!(query.into_spec(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_bad_price_is_bad_request() {
        let query = query_from("min=abc");
        assert!(matches!(query.into_spec(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_blank_price_bounds_fall_back_to_default() {
        let spec = parse("min=&max=");
        assert!(spec.price.is_default());
    }

    #[test]
    fn test_swapped_price_bounds_are_ordered() {
        let spec = parse("min=50&max=10");
        assert_eq!(spec.price, PriceRange::new(Decimal::from(10), Decimal::from(50)));
    }

    #[test]
    fn test_page_is_one_based() {
        assert_eq!(parse("page=1").page, 0);
        assert_eq!(parse("page=0").page, 0);
        assert_eq!(parse("page=4").page, 3);
    }

    #[test]
    fn test_toggle_link_resets_page() {
        let mut spec = FilterSpec::default();
        spec.set_page(2);
        let href = href_with(&spec, |s| s.toggle_size("64GB"));
        assert_eq!(href, "/shop?size=64GB");
    }

    #[test]
    fn test_option_links_mark_active() {
        let mut spec = FilterSpec::default();
        spec.toggle_brand("Sony");
        let links = option_links(
            &spec,
            BRANDS.iter().map(|b| (*b, *b)),
            &spec.brand,
            FilterSpec::toggle_brand,
        );
        let sony = links.iter().find(|l| l.value == "Sony").unwrap();
        assert!(sony.active);
        assert_eq!(sony.href, "/shop");
        let canon = links.iter().find(|l| l.value == "Canon").unwrap();
        assert!(!canon.active);
        assert_eq!(canon.href, "/shop?brand=Canon");
    }
}
