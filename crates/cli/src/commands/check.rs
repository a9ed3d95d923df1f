//! Catalog consistency report.
//!
//! Lists duplicate ids and products whose data breaks the catalog's own
//! rules (price above origin price, more sold than stocked, repeated sizes).
//! Findings are reported but never fatal; only an unreadable file fails.

use std::path::Path;

use shutterbay_core::catalog::Catalog;
use tracing::{info, warn};

/// Summary of one check run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub products: usize,
    pub duplicate_ids: Vec<String>,
    /// `(product id, finding)` pairs.
    pub findings: Vec<(String, String)>,
}

impl Report {
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let findings = catalog
            .anomalies()
            .into_iter()
            .flat_map(|(product, anomalies)| {
                anomalies
                    .into_iter()
                    .map(move |anomaly| (product.id.to_string(), anomaly.to_string()))
            })
            .collect();

        Self {
            products: catalog.len(),
            duplicate_ids: catalog.duplicate_ids().iter().map(ToString::to_string).collect(),
            findings,
        }
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty() && self.findings.is_empty()
    }
}

/// Check the catalog at `path` and log what was found.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = super::load_catalog(path).await?;
    let report = Report::from_catalog(&catalog);

    for id in &report.duplicate_ids {
        warn!(product_id = %id, "Duplicate product id; first occurrence wins");
    }
    for (id, finding) in &report.findings {
        warn!(product_id = %id, "{finding}");
    }

    if report.is_clean() {
        info!(products = report.products, "Catalog is clean");
    } else {
        info!(
            products = report.products,
            duplicates = report.duplicate_ids.len(),
            findings = report.findings.len(),
            "Catalog check finished with findings"
        );
    }
    Ok(())
}
