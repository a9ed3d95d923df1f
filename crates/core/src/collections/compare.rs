//! Product comparison list, capped at [`COMPARE_CAPACITY`] entries.

use super::{CollectionFull, ItemStore, Kind, Toggle};
use crate::types::Product;

/// Most products that can be compared side by side.
pub const COMPARE_CAPACITY: usize = 3;

/// Marker for the compare collection.
#[derive(Debug)]
pub enum Compare {}

impl Kind for Compare {
    type Entry = Product;
    const STORAGE_KEY: &'static str = "compare";
    const CAPACITY: Option<usize> = Some(COMPARE_CAPACITY);
}

/// The visitor's comparison list.
pub type CompareStore = ItemStore<Compare>;

impl ItemStore<Compare> {
    /// Add the product, or remove it if it is already being compared.
    ///
    /// Removing is always allowed, including when the list is full.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionFull`] when adding to a full list. Nothing changes.
    pub fn toggle(&mut self, product: Product) -> Result<Toggle, CollectionFull> {
        if self.contains(&product.id) {
            self.remove(&product.id);
            return Ok(Toggle::Removed);
        }
        self.add(product)?;
        Ok(Toggle::Added)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ProductId;
    use crate::storage::{MemoryStorage, Storage};
    use crate::types::product::fixtures::product;

    fn open() -> CompareStore {
        CompareStore::open(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_fourth_add_is_rejected_without_change() {
        let mut compare = open();
        for id in ["a", "b", "c"] {
            compare.add(product(id, 1, 0)).unwrap();
        }
        let before = compare.state().clone();

        let err = compare.add(product("d", 1, 0)).unwrap_err();
        assert_eq!(err, CollectionFull { capacity: 3 });
        assert_eq!(compare.state(), &before);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut compare = open();
        for i in 0..20 {
            let _ = compare.add(product(&format!("p{i}"), 1, 0));
            let _ = compare.toggle(product(&format!("q{}", i % 5), 1, 0));
            assert!(compare.len() <= COMPARE_CAPACITY);
        }
    }

    #[test]
    fn test_toggle_removes_even_when_full() {
        let mut compare = open();
        for id in ["a", "b", "c"] {
            compare.toggle(product(id, 1, 0)).unwrap();
        }
        assert_eq!(compare.toggle(product("b", 1, 0)).unwrap(), Toggle::Removed);
        assert!(!compare.contains(&ProductId::new("b")));
        assert_eq!(compare.toggle(product("d", 1, 0)).unwrap(), Toggle::Added);
    }

    #[test]
    fn test_oversized_stored_list_is_truncated() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let products: Vec<Product> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|id| product(id, 1, 0))
            .collect();
        storage
            .set(Compare::STORAGE_KEY, &serde_json::to_string(&products).unwrap())
            .unwrap();

        let compare = CompareStore::open(Arc::clone(&storage));
        assert_eq!(compare.len(), COMPARE_CAPACITY);
        assert!(compare.contains(&ProductId::new("a")));
        assert!(!compare.contains(&ProductId::new("d")));

        let raw = storage.get(Compare::STORAGE_KEY).unwrap().unwrap();
        let stored: Vec<Product> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.len(), COMPARE_CAPACITY);
    }
}
