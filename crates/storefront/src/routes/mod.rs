//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to /shop
//! GET  /health                 - Health check
//!
//! # Listing
//! GET  /shop                   - Filtered, sorted, paginated product listing
//!
//! # Cart
//! GET  /cart                   - Cart page with subtotal
//! POST /cart/add               - Add product (or update its line)
//! POST /cart/update            - Change quantity, size and color of a line
//! POST /cart/remove            - Remove a line
//!
//! # Wishlist
//! GET  /wishlist               - Wishlist page
//! POST /wishlist/toggle        - Add or remove a product
//! POST /wishlist/remove        - Remove a product
//!
//! # Compare
//! GET  /compare                - Comparison table
//! POST /compare/toggle         - Add or remove a product (at most 3)
//! POST /compare/remove         - Remove a product
//!
//! # Auth
//! GET  /register               - Registration form
//! POST /register               - Submit registration
//! GET  /login                  - Login screen
//! ```

pub mod auth;
pub mod cart;
pub mod compare;
pub mod shop;
pub mod wishlist;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;
use shutterbay_core::ProductId;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Form body naming a single product.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: String,
    /// Page to go back to after the action.
    pub return_to: Option<String>,
}

/// Whether `path` stays on this site.
///
/// Browsers read `/\host` like `//host` and drop tabs and newlines before
/// resolving, so both are refused along with any other control character.
fn is_local_path(path: &str) -> bool {
    let mut chars = path.chars();
    chars.next() == Some('/')
        && !matches!(chars.next(), Some('/' | '\\'))
        && !path.chars().any(char::is_control)
}

/// Redirect to `return_to` if it is a local path, otherwise to `fallback`.
#[must_use]
pub fn redirect_back(return_to: Option<&str>, fallback: &str) -> Redirect {
    let target = return_to.filter(|path| is_local_path(path)).unwrap_or(fallback);
    Redirect::to(target)
}

/// Reject ids that neither the catalog nor the visitor's store knows.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] for unknown ids.
pub fn ensure_known(state: &AppState, in_store: bool, id: &ProductId) -> Result<()> {
    if in_store || state.catalog().find(id).is_some() {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("product {id}")))
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/toggle", post(wishlist::toggle))
        .route("/remove", post(wishlist::remove))
}

/// Create the compare routes router.
pub fn compare_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(compare::show))
        .route("/toggle", post(compare::toggle))
        .route("/remove", post(compare::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/shop") }))
        .route("/shop", get(shop::index))
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/compare", compare_routes())
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page))
}
