//! Key-value persistence adapter.
//!
//! The item stores mirror their contents into a [`Storage`] under a fixed key
//! per store. Values are JSON text. Implementations only need get/set/remove
//! on string keys; everything else (what is stored, when) is decided by the
//! stores.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend cannot be reached or is in a broken state.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the write.
    #[error("storage write rejected for {key}: {reason}")]
    WriteRejected {
        /// Key that was being written.
        key: String,
        /// Backend-supplied reason.
        reason: String,
    },
}

/// A string key-value store.
///
/// All methods take `&self`; implementations use interior mutability so one
/// instance can be shared by the cart, wishlist and compare stores.
pub trait Storage: Send + Sync + Debug {
    /// Read a value. Returns `Ok(None)` when the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Succeeds when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the delete.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, used by tests and offline tools.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Whether no key has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StorageError {
    StorageError::Unavailable("lock poisoned".to_string())
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.entries.read().map_err(|_| poisoned())?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.entries.write().map_err(|_| poisoned())?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self.entries.write().map_err(|_| poisoned())?;
        guard.remove(key);
        Ok(())
    }
}
