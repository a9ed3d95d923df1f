//! Application state shared across handlers.

use std::sync::Arc;

use shutterbay_core::catalog::{Catalog, CatalogError};
use shutterbay_core::{Product, ProductId};

use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::services::registration::{RegistrationClient, RegistrationError};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read catalog {path}: {source}")]
    CatalogRead {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the product catalog, configuration and upstream clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    registration: RegistrationClient,
}

impl AppState {
    /// Create a new application state from an already loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the registration client cannot be built.
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Result<Self, StateError> {
        let registration = RegistrationClient::new(config.signup_url.clone())?;

        for id in catalog.duplicate_ids() {
            tracing::warn!(product_id = %id, "Duplicate product id in catalog, keeping first");
        }
        for (product, anomalies) in catalog.anomalies() {
            for anomaly in anomalies {
                tracing::warn!(product_id = %product.id, %anomaly, "Catalog anomaly");
            }
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                registration,
            }),
        })
    }

    /// Create the state, reading the catalog from the configured path.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or parsed.
    pub fn load(config: StorefrontConfig) -> Result<Self, StateError> {
        let json = std::fs::read_to_string(&config.catalog_path).map_err(|source| {
            StateError::CatalogRead {
                path: config.catalog_path.display().to_string(),
                source,
            }
        })?;
        let catalog = Catalog::from_json(&json)?;
        tracing::info!(products = catalog.len(), "Catalog loaded");
        Self::new(config, catalog)
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the registration API client.
    #[must_use]
    pub fn registration(&self) -> &RegistrationClient {
        &self.inner.registration
    }

    /// Look up a product named in a request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown ids.
    pub fn product(&self, id: &str) -> Result<&Product, AppError> {
        self.catalog()
            .find(&ProductId::new(id))
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))
    }
}
