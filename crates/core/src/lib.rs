//! Shutterbay Core - catalog pipeline, item stores, and shared types.
//!
//! This crate holds everything the storefront computes that does not need
//! HTTP or a runtime:
//! - `storefront` - Server-rendered shop (listing, cart, wishlist, compare)
//! - `cli` - Offline catalog inspection
//!
//! # Architecture
//!
//! The core crate is synchronous and free of network I/O. Persistence goes
//! through the [`storage::Storage`] trait so the storefront can back it with
//! the visitor's session while tests use [`storage::MemoryStorage`].
//!
//! # Modules
//!
//! - [`types`] - Product model and identifiers
//! - [`catalog`] - Filter/sort/paginate pipeline over the product list
//! - [`collections`] - Cart, wishlist and compare stores
//! - [`comparison`] - Row model for the side-by-side comparison table
//! - [`storage`] - Key-value persistence adapter

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod collections;
pub mod comparison;
pub mod storage;
pub mod types;

pub use types::*;
