//! Item collection stores: cart, wishlist and compare.
//!
//! The three stores share one shape. State is an ordered [`Collection`] of
//! entries; every change goes through an [`Action`] reduced by the pure
//! [`reduce`] function into a new snapshot, and the [`ItemStore`] wrapper
//! mirrors the result into a [`Storage`] under the kind's fixed key.
//!
//! # Persistence rules
//!
//! - Stores hydrate from storage when opened, before any write can happen.
//! - After an action the whole collection is written if it is non-empty.
//! - A `Remove` always writes, so removing the last entry stores `[]`.
//! - The initial empty state is never written.
//! - Storage failures are logged and ignored; unreadable data means the
//!   collection starts empty for the session.

pub mod cart;
pub mod compare;
pub mod wishlist;

use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::storage::Storage;
use crate::types::{Product, ProductId};

pub use cart::{Cart, CartItem, CartStore, CartUpdate};
pub use compare::{COMPARE_CAPACITY, Compare, CompareStore};
pub use wishlist::{Wishlist, WishlistStore};

/// Storage keys of every store, in the order the storefront loads them.
pub const STORAGE_KEYS: [&str; 3] = [
    Cart::STORAGE_KEY,
    Wishlist::STORAGE_KEY,
    Compare::STORAGE_KEY,
];

/// An entry held by a collection. Identity is the wrapped product's id.
pub trait Entry: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned {
    /// In-place edit accepted by `Action::Update`.
    type Update: Clone + fmt::Debug;

    /// Build a fresh entry for a product being added.
    fn from_product(product: Product) -> Self;

    /// The product this entry refers to.
    fn product(&self) -> &Product;

    /// Apply an update to this entry.
    fn apply(&mut self, update: Self::Update);

    /// Identifier of the wrapped product.
    fn id(&self) -> &ProductId {
        &self.product().id
    }
}

/// Wishlist and compare entries are bare products and cannot be updated.
impl Entry for Product {
    type Update = Infallible;

    fn from_product(product: Product) -> Self {
        product
    }

    fn product(&self) -> &Product {
        self
    }

    fn apply(&mut self, update: Infallible) {
        match update {}
    }
}

/// A kind of collection: its entry type, storage key and capacity.
pub trait Kind {
    /// Entry type held by this collection.
    type Entry: Entry;

    /// Key the collection is persisted under.
    const STORAGE_KEY: &'static str;

    /// Maximum number of entries, if bounded.
    const CAPACITY: Option<usize> = None;
}

/// An immutable, ordered snapshot of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<E> {
    items: Vec<E>,
}

impl<E> Default for Collection<E> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<E: Entry> Collection<E> {
    /// Wrap entries in insertion order.
    #[must_use]
    pub const fn new(items: Vec<E>) -> Self {
        Self { items }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the entry for a product.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&E> {
        self.items.iter().find(|entry| entry.id() == id)
    }

    /// Whether an entry for the product exists.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }
}

/// A state transition for a collection.
#[derive(Debug, Clone)]
pub enum Action<E: Entry> {
    /// Append an entry built from the product.
    Add(Product),
    /// Drop every entry with this id.
    Remove(ProductId),
    /// Edit the entry with this id in place.
    Update(ProductId, E::Update),
    /// Replace the whole collection.
    Load(Vec<E>),
}

/// Compute the snapshot that follows `state` once `action` is applied.
///
/// Insertion order is preserved. Removing or updating an absent id yields an
/// equal snapshot. `Add` does not check for an existing entry; callers that
/// need uniqueness check first.
#[must_use]
pub fn reduce<E: Entry>(state: &Collection<E>, action: Action<E>) -> Collection<E> {
    match action {
        Action::Add(product) => {
            let mut items = state.items.clone();
            items.push(E::from_product(product));
            Collection { items }
        }
        Action::Remove(id) => Collection {
            items: state
                .items
                .iter()
                .filter(|entry| *entry.id() != id)
                .cloned()
                .collect(),
        },
        Action::Update(id, update) => {
            let mut items = state.items.clone();
            if let Some(entry) = items.iter_mut().find(|entry| *entry.id() == id) {
                entry.apply(update);
            }
            Collection { items }
        }
        Action::Load(items) => Collection { items },
    }
}

/// Returned when an add would push a bounded collection past its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("at most {capacity} products can be held at once")]
pub struct CollectionFull {
    /// The collection's capacity.
    pub capacity: usize,
}

/// Outcome of a toggle intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// A collection bound to its storage.
pub struct ItemStore<K: Kind> {
    state: Collection<K::Entry>,
    storage: Arc<dyn Storage>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: Kind> fmt::Debug for ItemStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemStore")
            .field("key", &K::STORAGE_KEY)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<K: Kind> ItemStore<K> {
    /// Open the store, hydrating it from storage.
    ///
    /// Missing, unreadable or malformed data leaves the store empty. Hydrated
    /// data is not written back unless it had to be truncated to capacity.
    #[must_use]
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let mut store = Self {
            state: Collection::default(),
            storage,
            _kind: PhantomData,
        };
        if let Some(entries) = store.read_persisted() {
            let stored = entries.len();
            let entries = Self::fit_capacity(entries);
            let truncated = entries.len() < stored;
            store.state = reduce(&store.state, Action::Load(entries));
            if truncated {
                store.persist();
            }
        }
        store
    }

    /// Current snapshot.
    #[must_use]
    pub const fn state(&self) -> &Collection<K::Entry> {
        &self.state
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[K::Entry] {
        self.state.items()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Whether an entry for the product exists.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.state.contains(id)
    }

    /// Apply an action, enforcing the kind's capacity on `Add`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionFull`] when an `Add` would exceed the capacity;
    /// the state is left unchanged.
    pub fn dispatch(&mut self, action: Action<K::Entry>) -> Result<(), CollectionFull> {
        let action = match (action, K::CAPACITY) {
            (Action::Add(_), Some(capacity)) if self.state.len() >= capacity => {
                return Err(CollectionFull { capacity });
            }
            (Action::Load(entries), _) => Action::Load(Self::fit_capacity(entries)),
            (action, _) => action,
        };
        self.commit(action);
        Ok(())
    }

    /// Drop entries beyond the kind's capacity, keeping the oldest.
    fn fit_capacity(mut entries: Vec<K::Entry>) -> Vec<K::Entry> {
        match K::CAPACITY {
            Some(capacity) if entries.len() > capacity => {
                tracing::warn!(
                    key = K::STORAGE_KEY,
                    dropped = entries.len() - capacity,
                    "Truncating loaded collection to capacity"
                );
                entries.truncate(capacity);
            }
            _ => {}
        }
        entries
    }

    /// Append a product.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionFull`] when the collection is at capacity.
    pub fn add(&mut self, product: Product) -> Result<(), CollectionFull> {
        self.dispatch(Action::Add(product))
    }

    /// Remove the product's entry. Absent ids are ignored.
    pub fn remove(&mut self, id: &ProductId) {
        self.commit(Action::Remove(id.clone()));
    }

    /// Replace the collection wholesale.
    pub fn load(&mut self, entries: Vec<K::Entry>) {
        // Only Add can be rejected; Load is truncated instead.
        let _ = self.dispatch(Action::Load(entries));
    }

    /// Reduce and persist without a capacity check.
    fn commit(&mut self, action: Action<K::Entry>) {
        let always_persist = matches!(action, Action::Remove(_));
        self.state = reduce(&self.state, action);
        if always_persist || !self.state.is_empty() {
            self.persist();
        }
    }

    fn read_persisted(&self) -> Option<Vec<K::Entry>> {
        let raw = match self.storage.get(K::STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = K::STORAGE_KEY, error = %e, "Failed to read stored collection");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Some(entries),
            Err(e) => {
                tracing::warn!(key = K::STORAGE_KEY, error = %e, "Discarding malformed stored collection");
                None
            }
        }
    }

    fn persist(&self) {
        let json = match serde_json::to_string(self.state.items()) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key = K::STORAGE_KEY, error = %e, "Failed to encode collection");
                return;
            }
        };

        if let Err(e) = self.storage.set(K::STORAGE_KEY, &json) {
            tracing::warn!(key = K::STORAGE_KEY, error = %e, "Failed to persist collection");
        }
    }
}

/// The three stores of one visitor session.
#[derive(Debug)]
pub struct Stores {
    pub cart: CartStore,
    pub wishlist: WishlistStore,
    pub compare: CompareStore,
}

impl Stores {
    /// Open all stores against one storage.
    #[must_use]
    pub fn open(storage: &Arc<dyn Storage>) -> Self {
        Self {
            cart: CartStore::open(Arc::clone(storage)),
            wishlist: WishlistStore::open(Arc::clone(storage)),
            compare: CompareStore::open(Arc::clone(storage)),
        }
    }
}
