//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use shutterbay_core::ProductId;
use shutterbay_core::collections::Toggle;
use tracing::instrument;

use super::shop::ProductCard;
use super::{ProductForm, ensure_known, redirect_back};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{NavCounts, Shopper};
use crate::state::AppState;

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistShowTemplate {
    pub nav: NavCounts,
    pub cards: Vec<ProductCard>,
}

/// Display the wishlist.
#[instrument(skip(shopper))]
pub async fn show(shopper: Shopper) -> WishlistShowTemplate {
    WishlistShowTemplate {
        nav: shopper.nav(),
        cards: shopper
            .stores
            .wishlist
            .items()
            .iter()
            .map(|p| ProductCard::new(p, &shopper.stores))
            .collect(),
    }
}

/// Save a product, or drop it if it is already saved.
#[instrument(skip(state, shopper))]
pub async fn toggle(
    State(state): State<AppState>,
    mut shopper: Shopper,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let product = state.product(&form.product_id)?.clone();
    let outcome = shopper.stores.wishlist.toggle(product);
    shopper.save().await?;

    let message = match outcome {
        Toggle::Added => "Added to wishlist",
        Toggle::Removed => "Removed from wishlist",
    };
    add_breadcrumb("wishlist", message, &[("product_id", form.product_id.as_str())]);
    Ok(redirect_back(form.return_to.as_deref(), "/wishlist"))
}

/// Remove a product from the wishlist.
#[instrument(skip(state, shopper))]
pub async fn remove(
    State(state): State<AppState>,
    mut shopper: Shopper,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let id = ProductId::new(form.product_id);
    ensure_known(&state, shopper.stores.wishlist.contains(&id), &id)?;
    shopper.stores.wishlist.remove(&id);
    shopper.save().await?;
    Ok(redirect_back(form.return_to.as_deref(), "/wishlist"))
}
