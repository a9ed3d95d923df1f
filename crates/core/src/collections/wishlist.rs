//! Wishlist.

use super::{ItemStore, Kind, Toggle};
use crate::types::Product;

/// Marker for the wishlist collection.
#[derive(Debug)]
pub enum Wishlist {}

impl Kind for Wishlist {
    type Entry = Product;
    const STORAGE_KEY: &'static str = "wishlist";
}

/// The visitor's wishlist.
pub type WishlistStore = ItemStore<Wishlist>;

impl ItemStore<Wishlist> {
    /// Add the product, or remove it if it is already saved.
    pub fn toggle(&mut self, product: Product) -> Toggle {
        if self.contains(&product.id) {
            self.remove(&product.id);
            Toggle::Removed
        } else {
            // Unbounded, so the add cannot be rejected.
            let _ = self.add(product);
            Toggle::Added
        }
    }
}
