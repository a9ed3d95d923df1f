//! Clients for services the storefront calls out to.

pub mod registration;

pub use registration::{Registration, RegistrationClient, RegistrationError};
