//! Core types for Shutterbay.
//!
//! This module provides the product model shared by the catalog pipeline and
//! the item stores.

pub mod id;
pub mod product;

pub use id::ProductId;
pub use product::{Anomaly, Product, Variation};
