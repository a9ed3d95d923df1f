//! Offline listing preview.
//!
//! Runs the storefront's filter, sort and paginate pipeline over a catalog
//! file so merchandisers can see a listing page without starting a server.

use std::num::NonZeroUsize;
use std::path::Path;

use shutterbay_core::catalog::{FilterSpec, ListingEntry, browse};
use tracing::info;

/// Render one listing page from the catalog at `path`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn run(
    path: &Path,
    spec: &FilterSpec,
    per_page: NonZeroUsize,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = super::load_catalog(path).await?;
    let listing = browse(catalog.products(), spec, per_page);

    info!(
        found = listing.filtered_total,
        page = listing.current_page + 1,
        pages = listing.page_count,
        sort = %spec.sort.label(),
        "Listing"
    );

    for entry in &listing.entries {
        match entry {
            ListingEntry::Product(product) => info!(
                id = %product.id,
                brand = %product.brand,
                kind = %product.kind,
                price = %product.price,
                sold = product.sold,
                "{}",
                product.name
            ),
            ListingEntry::NoMatches => info!("No products match the selected criteria."),
        }
    }
    Ok(())
}
