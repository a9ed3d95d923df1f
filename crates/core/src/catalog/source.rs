//! The product list as loaded from the catalog source.

use std::collections::HashMap;

use thiserror::Error;

use crate::types::{Anomaly, Product, ProductId};

/// Errors reading a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not a valid product list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only product list with lookup by id.
///
/// Products keep their source order. When an id repeats, lookups resolve to
/// the first occurrence and the repeat is reported by [`Catalog::duplicate_ids`].
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<ProductId, usize>,
    duplicates: Vec<ProductId>,
}

impl Catalog {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut by_id = HashMap::with_capacity(products.len());
        let mut duplicates = Vec::new();
        for (position, product) in products.iter().enumerate() {
            if by_id.contains_key(&product.id) {
                duplicates.push(product.id.clone());
            } else {
                by_id.insert(product.id.clone(), position);
            }
        }
        Self {
            products,
            by_id,
            duplicates,
        }
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] when the document is not a product list.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Self::new(products))
    }

    /// Every product, in source order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look a product up by id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.by_id
            .get(id)
            .and_then(|&position| self.products.get(position))
    }

    /// Ids that appear more than once, one entry per repeat.
    #[must_use]
    pub fn duplicate_ids(&self) -> &[ProductId] {
        &self.duplicates
    }

    /// Every product that breaks a catalog invariant, with what it breaks.
    #[must_use]
    pub fn anomalies(&self) -> Vec<(&Product, Vec<Anomaly>)> {
        self.products
            .iter()
            .map(|p| (p, p.anomalies()))
            .filter(|(_, found)| !found.is_empty())
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::product::fixtures::product;

    #[test]
    fn test_find_by_id() {
        let catalog = Catalog::new(vec![product("a", 1, 0), product("b", 2, 0)]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.find(&ProductId::new("b")).unwrap().price,
            Decimal::from(2)
        );
        assert!(catalog.find(&ProductId::new("zzz")).is_none());
    }

    #[test]
    fn test_duplicate_resolves_to_first() {
        let catalog = Catalog::new(vec![
            product("a", 1, 0),
            product("b", 2, 0),
            product("a", 3, 0),
        ]);
        assert_eq!(catalog.duplicate_ids(), [ProductId::new("a")]);
        assert_eq!(
            catalog.find(&ProductId::new("a")).unwrap().price,
            Decimal::from(1)
        );
        assert_eq!(catalog.products().len(), 3);
    }

    #[test]
    fn test_from_json_rejects_non_list() {
        assert!(Catalog::from_json(r#"{"id": "a"}"#).is_err());
        assert!(Catalog::from_json("[]").unwrap().is_empty());
    }

    #[test]
    fn test_anomalies_only_lists_offenders() {
        let mut bad = product("bad", 10, 0);
        bad.origin_price = Decimal::from(5);
        let catalog = Catalog::new(vec![product("ok", 1, 0), bad]);
        let found = catalog.anomalies();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0.id, ProductId::new("bad"));
        assert_eq!(found[0].1, [Anomaly::PriceAboveOrigin]);
    }
}
