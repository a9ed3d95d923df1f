//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_SIGNUP_URL` - Account registration endpoint
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CATALOG_PATH` - Product catalog JSON (default: crates/storefront/data/products.json)
//! - `STOREFRONT_PRODUCTS_PER_PAGE` - Listing page size (default: 12)
//! - `STOREFRONT_LOGIN_URL` - External login page linked from the login screen
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_PATH: &str = "crates/storefront/data/products.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Product catalog document
    pub catalog_path: PathBuf,
    /// Products shown per listing page
    pub products_per_page: NonZeroUsize,
    /// Account registration endpoint
    pub signup_url: Url,
    /// External login page, if any
    pub login_url: Option<Url>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let catalog_path = PathBuf::from(get_env_or_default(
            "STOREFRONT_CATALOG_PATH",
            DEFAULT_CATALOG_PATH,
        ));
        let products_per_page = parse_page_size(&get_env_or_default(
            "STOREFRONT_PRODUCTS_PER_PAGE",
            "12",
        ))?;
        let signup_url = parse_url(
            "STOREFRONT_SIGNUP_URL",
            &get_required_env("STOREFRONT_SIGNUP_URL")?,
        )?;
        let login_url = get_optional_env("STOREFRONT_LOGIN_URL")
            .map(|raw| parse_url("STOREFRONT_LOGIN_URL", &raw))
            .transpose()?;

        Ok(Self {
            host,
            port,
            base_url,
            catalog_path,
            products_per_page,
            signup_url,
            login_url,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_page_size(raw: &str) -> Result<NonZeroUsize, ConfigError> {
    raw.parse::<NonZeroUsize>().map_err(|e| {
        ConfigError::InvalidEnvVar("STOREFRONT_PRODUCTS_PER_PAGE".to_string(), e.to_string())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            products_per_page: NonZeroUsize::new(12).unwrap(),
            signup_url: Url::parse("http://localhost:4000/api/signup").unwrap(),
            login_url: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure() {
        let mut config = config();
        assert!(!config.is_secure());
        config.base_url = "https://shutterbay.example".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_page_size_must_be_positive() {
        assert_eq!(parse_page_size("24").unwrap().get(), 24);
        assert!(matches!(
            parse_page_size("0"),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "STOREFRONT_PRODUCTS_PER_PAGE"
        ));
        assert!(parse_page_size("twelve").is_err());
    }

    #[test]
    fn test_parse_url_reports_variable() {
        let err = parse_url("STOREFRONT_SIGNUP_URL", "not a url").unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_SIGNUP_URL"));
    }
}
