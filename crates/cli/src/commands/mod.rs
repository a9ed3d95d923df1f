//! Command implementations.

pub mod browse;
pub mod check;

use std::path::Path;

use shutterbay_core::catalog::{Catalog, CatalogError};
use tracing::info;

/// Errors raised while loading a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: CatalogError,
    },
}

/// Read and parse the catalog at `path`.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or is not a valid catalog.
pub async fn load_catalog(path: &Path) -> Result<Catalog, LoadError> {
    let path_str = path.display().to_string();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Read {
            path: path_str.clone(),
            source,
        })?;
    let catalog = Catalog::from_json(&json).map_err(|source| LoadError::Parse {
        path: path_str.clone(),
        source,
    })?;

    info!(path = %path_str, products = catalog.len(), "Loaded catalog");
    Ok(catalog)
}
