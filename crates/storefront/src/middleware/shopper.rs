//! Per-request access to the visitor's stores.
//!
//! The core stores persist through the synchronous [`Storage`] trait, while
//! the session API is async. [`SessionStorage`] bridges the two: it reads the
//! store keys from the session up front, serves the stores from that
//! snapshot, and writes back only the keys that changed when the handler
//! calls [`Shopper::save`].

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, RwLock};

use axum::{extract::FromRequestParts, http::request::Parts};
use shutterbay_core::collections::{STORAGE_KEYS, Stores};
use shutterbay_core::storage::{Storage, StorageError};
use tower_sessions::Session;

use crate::error::AppError;

#[derive(Debug, Default)]
struct Snapshot {
    entries: HashMap<String, String>,
    dirty: BTreeSet<String>,
}

/// Session-backed [`Storage`] for one request.
#[derive(Debug, Default)]
pub struct SessionStorage {
    snapshot: RwLock<Snapshot>,
}

impl SessionStorage {
    /// Read every store key from the session.
    ///
    /// Keys that cannot be read are treated as absent.
    pub async fn load(session: &Session) -> Self {
        let mut entries = HashMap::new();
        for key in STORAGE_KEYS {
            match session.get::<String>(key).await {
                Ok(Some(value)) => {
                    entries.insert(key.to_string(), value);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(key, error = %e, "Failed to read session value"),
            }
        }
        Self {
            snapshot: RwLock::new(Snapshot {
                entries,
                dirty: BTreeSet::new(),
            }),
        }
    }

    /// Write changed keys back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects a write.
    pub async fn commit(&self, session: &Session) -> Result<(), AppError> {
        let changes: Vec<(String, Option<String>)> = {
            let mut snapshot = self
                .snapshot
                .write()
                .map_err(|_| AppError::Internal("session snapshot lock poisoned".to_string()))?;
            let dirty = std::mem::take(&mut snapshot.dirty);
            dirty
                .into_iter()
                .map(|key| {
                    let value = snapshot.entries.get(&key).cloned();
                    (key, value)
                })
                .collect()
        };

        for (key, value) in changes {
            match value {
                Some(value) => session.insert(&key, value).await?,
                None => {
                    session.remove::<String>(&key).await?;
                }
            }
        }
        Ok(())
    }

    /// Keys changed since the snapshot was loaded or last committed.
    #[must_use]
    pub fn pending(&self) -> Vec<String> {
        self.snapshot
            .read()
            .map(|snapshot| snapshot.dirty.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Storage for SessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        Ok(snapshot.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut snapshot = self
            .snapshot
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        snapshot.entries.insert(key.to_string(), value.to_string());
        snapshot.dirty.insert(key.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut snapshot = self
            .snapshot
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        snapshot.entries.remove(key);
        snapshot.dirty.insert(key.to_string());
        Ok(())
    }
}

/// Extractor giving handlers the visitor's cart, wishlist and compare list.
///
/// Handlers that change a store must call [`Shopper::save`] before
/// responding.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(mut shopper: Shopper) -> Result<Redirect> {
///     shopper.stores.wishlist.remove(&id);
///     shopper.save().await?;
///     Ok(Redirect::to("/wishlist"))
/// }
/// ```
pub struct Shopper {
    session: Session,
    storage: Arc<SessionStorage>,
    pub stores: Stores,
}

impl fmt::Debug for Shopper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shopper")
            .field("stores", &self.stores)
            .finish_non_exhaustive()
    }
}

impl Shopper {
    /// Hydrate the stores from `session`.
    pub async fn open(session: Session) -> Self {
        let storage = Arc::new(SessionStorage::load(&session).await);
        let shared: Arc<dyn Storage> = storage.clone();
        let stores = Stores::open(&shared);
        Self {
            session,
            storage,
            stores,
        }
    }

    /// Persist store changes to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects a write.
    pub async fn save(&self) -> Result<(), AppError> {
        self.storage.commit(&self.session).await
    }

    /// Badge counts for the page header.
    #[must_use]
    pub fn nav(&self) -> NavCounts {
        NavCounts {
            cart: self.stores.cart.total_quantity(),
            wishlist: self.stores.wishlist.len(),
            compare: self.stores.compare.len(),
        }
    }
}

impl<S> FromRequestParts<S> for Shopper
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        Ok(Self::open(session).await)
    }
}

/// Header badge counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavCounts {
    pub cart: u32,
    pub wishlist: usize,
    pub compare: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use shutterbay_core::Product;
    use shutterbay_core::collections::Cart;
    use shutterbay_core::collections::Kind;

    use super::*;
    use crate::middleware::session::create_session_store;

    fn session() -> Session {
        Session::new(None, Arc::new(create_session_store()), None)
    }

    fn product(id: &str) -> Product {
        serde_json::from_str(&format!(
            r#"{{"id": "{id}", "name": "Lens {id}", "category": "camera", "type": "Lenses",
                "gender": "unisex", "price": 20, "originPrice": 25, "brand": "Canon"}}"#
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_untouched_snapshot_writes_nothing() {
        let session = session();
        let shopper = Shopper::open(session.clone()).await;
        assert!(shopper.storage.pending().is_empty());
        shopper.save().await.unwrap();
        assert!(session.is_empty().await);
    }

    #[tokio::test]
    async fn test_hydrated_keys_are_not_rewritten() {
        let session = session();
        let mut shopper = Shopper::open(session.clone()).await;
        shopper.stores.cart.add_or_update(product("1"), "", "");
        shopper.stores.wishlist.toggle(product("2"));
        shopper.stores.compare.toggle(product("3")).unwrap();
        shopper.save().await.unwrap();

        let reopened = Shopper::open(session).await;
        assert_eq!(reopened.stores.cart.len(), 1);
        assert_eq!(reopened.stores.wishlist.len(), 1);
        assert_eq!(reopened.stores.compare.len(), 1);
        assert!(reopened.storage.pending().is_empty());
    }

    #[tokio::test]
    async fn test_changes_reach_the_session() {
        let session = session();
        let storage = SessionStorage::load(&session).await;
        storage.set(Cart::STORAGE_KEY, "[]").unwrap();
        assert_eq!(storage.pending(), [Cart::STORAGE_KEY]);

        storage.commit(&session).await.unwrap();
        assert!(storage.pending().is_empty());
        assert_eq!(
            session.get::<String>(Cart::STORAGE_KEY).await.unwrap().as_deref(),
            Some("[]")
        );

        let reloaded = SessionStorage::load(&session).await;
        assert_eq!(reloaded.get(Cart::STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_remove_clears_session_key() {
        let session = session();
        session
            .insert(Cart::STORAGE_KEY, "[]".to_string())
            .await
            .unwrap();

        let storage = SessionStorage::load(&session).await;
        storage.remove(Cart::STORAGE_KEY).unwrap();
        storage.commit(&session).await.unwrap();
        assert_eq!(session.get::<String>(Cart::STORAGE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_nav_counts() {
        let shopper = Shopper::open(session()).await;
        assert_eq!(shopper.nav(), NavCounts::default());
    }
}
