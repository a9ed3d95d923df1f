//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions over a `moka` cache.
//! Sessions hold the shopper's cart, wishlist and compare list. The cache
//! evicts records once their expiry date passes and caps how many sessions
//! are held at once, dropping the least recently used first.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "sb_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Most sessions held in memory at once.
pub const SESSION_CAPACITY: u64 = 100_000;

/// Create the bounded session store.
#[must_use]
pub fn create_session_store() -> MokaStore {
    MokaStore::new(Some(SESSION_CAPACITY))
}

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(create_session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
