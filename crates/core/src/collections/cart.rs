//! Shopping cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Action, Entry, ItemStore, Kind};
use crate::types::{Product, ProductId};

/// A product in the cart with the shopper's choices.
///
/// Empty `selected_size` / `selected_color` mean "not chosen".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
    #[serde(default)]
    pub selected_size: String,
    #[serde(default)]
    pub selected_color: String,
}

impl CartItem {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Replacement values for a cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartUpdate {
    pub quantity: u32,
    pub selected_size: String,
    pub selected_color: String,
}

impl Entry for CartItem {
    type Update = CartUpdate;

    fn from_product(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
            selected_size: String::new(),
            selected_color: String::new(),
        }
    }

    fn product(&self) -> &Product {
        &self.product
    }

    fn apply(&mut self, update: CartUpdate) {
        self.quantity = update.quantity;
        self.selected_size = update.selected_size;
        self.selected_color = update.selected_color;
    }
}

/// Marker for the cart collection.
#[derive(Debug)]
pub enum Cart {}

impl Kind for Cart {
    type Entry = CartItem;
    const STORAGE_KEY: &'static str = "cart";
}

/// The visitor's cart.
pub type CartStore = ItemStore<Cart>;

impl ItemStore<Cart> {
    /// Replace quantity, size and color of a line. Absent ids are ignored.
    pub fn update(
        &mut self,
        id: &ProductId,
        quantity: u32,
        selected_size: impl Into<String>,
        selected_color: impl Into<String>,
    ) {
        self.commit(Action::Update(
            id.clone(),
            CartUpdate {
                quantity,
                selected_size: selected_size.into(),
                selected_color: selected_color.into(),
            },
        ));
    }

    /// Put a product in the cart with the chosen size and color.
    ///
    /// Adds the product when it is not in the cart yet, then sets the line to
    /// the product's purchase quantity (at least one) and the given choices.
    pub fn add_or_update(&mut self, product: Product, size: &str, color: &str) {
        let id = product.id.clone();
        let quantity = product.quantity_purchase.max(1);
        if !self.contains(&id) {
            self.commit(Action::Add(product));
        }
        self.update(&id, quantity, size, color);
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items().iter().map(CartItem::line_total).sum()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items().iter().map(|item| item.quantity).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{MemoryStorage, Storage};
    use crate::types::product::fixtures::product;

    fn open_cart() -> (Arc<dyn Storage>, CartStore) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let cart = CartStore::open(Arc::clone(&storage));
        (storage, cart)
    }

    #[test]
    fn test_new_item_defaults() {
        let item = CartItem::from_product(product("a", 10, 0));
        assert_eq!(item.quantity, 1);
        assert!(item.selected_size.is_empty());
        assert!(item.selected_color.is_empty());
    }

    #[test]
    fn test_update_replaces_fields() {
        let (_, mut cart) = open_cart();
        cart.add(product("a", 10, 0)).unwrap();
        cart.update(&ProductId::new("a"), 3, "64GB", "black");

        let line = &cart.items()[0];
        assert_eq!(line.quantity, 3);
        assert_eq!(line.selected_size, "64GB");
        assert_eq!(line.selected_color, "black");
    }

    #[test]
    fn test_update_absent_is_noop() {
        let (_, mut cart) = open_cart();
        cart.add(product("a", 10, 0)).unwrap();
        let before = cart.state().clone();
        cart.update(&ProductId::new("missing"), 9, "", "");
        assert_eq!(cart.state(), &before);
    }

    #[test]
    fn test_add_or_update_keeps_one_line_per_product() {
        let (_, mut cart) = open_cart();
        let mut p = product("a", 10, 0);
        p.quantity_purchase = 2;

        cart.add_or_update(p.clone(), "32GB", "");
        cart.add_or_update(p, "64GB", "red");

        assert_eq!(cart.len(), 1);
        let line = &cart.items()[0];
        assert_eq!(line.quantity, 2);
        assert_eq!(line.selected_size, "64GB");
        assert_eq!(line.selected_color, "red");
    }

    #[test]
    fn test_add_or_update_zero_purchase_quantity_becomes_one() {
        let (_, mut cart) = open_cart();
        let mut p = product("a", 10, 0);
        p.quantity_purchase = 0;
        cart.add_or_update(p, "", "");
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_subtotal_and_quantity() {
        let (_, mut cart) = open_cart();
        cart.add(product("a", 10, 0)).unwrap();
        cart.add(product("b", 5, 0)).unwrap();
        cart.update(&ProductId::new("a"), 3, "", "");

        assert_eq!(cart.subtotal(), Decimal::from(35));
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_persistence_round_trip() {
        let (storage, mut cart) = open_cart();
        cart.add(product("a", 10, 0)).unwrap();
        cart.add(product("b", 20, 0)).unwrap();
        cart.update(&ProductId::new("a"), 2, "128GB", "green");
        cart.update(&ProductId::new("b"), 1, "", "white");

        let reloaded = CartStore::open(storage);
        let summary = |store: &CartStore| -> Vec<(String, u32, String, String)> {
            store
                .items()
                .iter()
                .map(|item| {
                    (
                        item.product.id.to_string(),
                        item.quantity,
                        item.selected_size.clone(),
                        item.selected_color.clone(),
                    )
                })
                .collect()
        };
        assert_eq!(summary(&reloaded), summary(&cart));
        assert_eq!(reloaded.state(), cart.state());
    }

    #[test]
    fn test_serialized_line_is_flat() {
        let mut item = CartItem::from_product(product("a", 10, 0));
        item.selected_size = "64GB".to_string();
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["id"], "a");
        assert_eq!(value["quantity"], 1);
        assert_eq!(value["selectedSize"], "64GB");
        assert_eq!(value["type"], "Lenses");
    }
}
