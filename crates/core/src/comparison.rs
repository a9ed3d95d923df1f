//! Side-by-side product comparison table.

use rust_decimal::Decimal;

use crate::collections::{COMPARE_CAPACITY, CollectionFull};
use crate::types::{Product, ProductId};

/// Material shown for every compared product; the catalog carries no
/// material field.
pub const MATERIAL: &str = "Cotton";

/// One cell of a comparison row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Star rating.
    Rating(f32),
    Price(Decimal),
    /// Available sizes, in catalog order.
    Sizes(Vec<String>),
    /// Swatch color codes, one per variation.
    Swatches(Vec<String>),
    /// Add-to-cart button for the product.
    AddToCart(ProductId),
}

/// A labelled row with one cell per compared product.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub label: &'static str,
    pub cells: Vec<Cell>,
}

/// Column header for one compared product.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub id: ProductId,
    pub name: String,
    pub thumbnail: Option<String>,
}

/// Comparison table over at most [`COMPARE_CAPACITY`] products.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl ComparisonTable {
    /// Row labels, top to bottom.
    pub const LABELS: [&'static str; 8] = [
        "Rating",
        "Price",
        "Type",
        "Brand",
        "Size",
        "Colors",
        "Material",
        "Add To Cart",
    ];

    /// Build the table for `products`, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionFull`] when more than [`COMPARE_CAPACITY`]
    /// products are supplied.
    pub fn new(products: &[Product]) -> Result<Self, CollectionFull> {
        if products.len() > COMPARE_CAPACITY {
            return Err(CollectionFull {
                capacity: COMPARE_CAPACITY,
            });
        }

        let columns = products
            .iter()
            .map(|p| Column {
                id: p.id.clone(),
                name: p.name.clone(),
                thumbnail: p.thumbnail().map(str::to_owned),
            })
            .collect();

        let rows = Self::LABELS
            .iter()
            .map(|&label| Row {
                label,
                cells: products.iter().map(|p| cell(label, p)).collect(),
            })
            .collect();

        Ok(Self { columns, rows })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Row by label.
    #[must_use]
    pub fn row(&self, label: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.label == label)
    }
}

fn cell(label: &str, product: &Product) -> Cell {
    match label {
        "Rating" => Cell::Rating(product.rate),
        "Price" => Cell::Price(product.price),
        "Type" => Cell::Text(product.kind.clone()),
        "Brand" => Cell::Text(product.brand.clone()),
        "Size" => Cell::Sizes(product.sizes.clone()),
        "Colors" => Cell::Swatches(
            product
                .variation
                .iter()
                .map(|v| v.color_code.clone())
                .collect(),
        ),
        "Material" => Cell::Text(MATERIAL.to_string()),
        _ => Cell::AddToCart(product.id.clone()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::product::fixtures::{product, variation};

    #[test]
    fn test_rows_in_order() {
        let table = ComparisonTable::new(&[product("a", 10, 0)]).unwrap();
        let labels: Vec<&str> = table.rows.iter().map(|r| r.label).collect();
        assert_eq!(labels, ComparisonTable::LABELS);
    }

    #[test]
    fn test_one_cell_per_product() {
        let products = [product("a", 10, 0), product("b", 20, 0)];
        let table = ComparisonTable::new(&products).unwrap();
        assert_eq!(table.columns.len(), 2);
        assert!(table.rows.iter().all(|row| row.cells.len() == 2));
        assert_eq!(table.columns[1].id, ProductId::new("b"));
    }

    #[test]
    fn test_empty_table() {
        let table = ComparisonTable::new(&[]).unwrap();
        assert!(table.is_empty());
        assert!(table.rows.iter().all(|row| row.cells.is_empty()));
    }

    #[test]
    fn test_more_than_capacity_is_rejected() {
        let products: Vec<Product> = (0..4).map(|i| product(&i.to_string(), 1, 0)).collect();
        assert_eq!(
            ComparisonTable::new(&products).unwrap_err(),
            CollectionFull { capacity: 3 }
        );
    }

    #[test]
    fn test_cell_contents() {
        let mut p = product("a", 25, 0);
        p.sizes = vec!["64GB".to_string()];
        p.variation = vec![variation("red"), variation("black")];
        let table = ComparisonTable::new(&[p]).unwrap();

        assert_eq!(
            table.row("Price").unwrap().cells,
            [Cell::Price(Decimal::from(25))]
        );
        assert_eq!(
            table.row("Brand").unwrap().cells,
            [Cell::Text("Canon".to_string())]
        );
        assert_eq!(
            table.row("Material").unwrap().cells,
            [Cell::Text(MATERIAL.to_string())]
        );
        assert_eq!(
            table.row("Size").unwrap().cells,
            [Cell::Sizes(vec!["64GB".to_string()])]
        );
        let Cell::Swatches(codes) = &table.row("Colors").unwrap().cells[0] else {
            panic!("expected swatches");
        };
        assert_eq!(codes.len(), 2);
        assert_eq!(
            table.row("Add To Cart").unwrap().cells,
            [Cell::AddToCart(ProductId::new("a"))]
        );
    }
}
