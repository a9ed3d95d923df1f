//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Every mutation redirects back so
//! a reload never repeats the form submission.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use rust_decimal::Decimal;
use serde::Deserialize;
use shutterbay_core::ProductId;
use shutterbay_core::collections::CartItem;
use tracing::instrument;

use super::{ProductForm, ensure_known, redirect_back};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{NavCounts, Shopper};
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub thumbnail: Option<String>,
    pub quantity: u32,
    pub selected_size: String,
    pub selected_color: String,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub price: Decimal,
    pub line_total: Decimal,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        let product = &item.product;
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            thumbnail: product.thumbnail().map(str::to_owned),
            quantity: item.quantity,
            selected_size: item.selected_size.clone(),
            selected_color: item.selected_color.clone(),
            sizes: product.sizes.clone(),
            colors: product.variation.iter().map(|v| v.color.clone()).collect(),
            price: product.price,
            line_total: item.line_total(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            item_count: 0,
        }
    }

    #[must_use]
    pub fn from_shopper(shopper: &Shopper) -> Self {
        let cart = &shopper.stores.cart;
        if cart.is_empty() {
            return Self::empty();
        }
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal(),
            item_count: cart.total_quantity(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub return_to: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: NavCounts,
    pub cart: CartView,
}

/// Display cart page.
#[instrument(skip(shopper))]
pub async fn show(shopper: Shopper) -> CartShowTemplate {
    CartShowTemplate {
        nav: shopper.nav(),
        cart: CartView::from_shopper(&shopper),
    }
}

/// Put a product in the cart with the chosen size and color.
#[instrument(skip(state, shopper))]
pub async fn add(
    State(state): State<AppState>,
    mut shopper: Shopper,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let product = state.product(&form.product_id)?.clone();
    shopper
        .stores
        .cart
        .add_or_update(product, &form.size, &form.color);
    shopper.save().await?;

    add_breadcrumb("cart", "Added to cart", &[("product_id", form.product_id.as_str())]);
    Ok(redirect_back(form.return_to.as_deref(), "/cart"))
}

/// Change quantity, size and color of a cart line.
///
/// Quantities below one are raised to one; removing a line goes through
/// `/cart/remove`.
#[instrument(skip(shopper))]
pub async fn update(mut shopper: Shopper, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    let id = ProductId::new(form.product_id);
    if !shopper.stores.cart.contains(&id) {
        return Err(AppError::NotFound(format!("cart line {id}")));
    }
    shopper
        .stores
        .cart
        .update(&id, form.quantity.max(1), form.size, form.color);
    shopper.save().await?;
    Ok(Redirect::to("/cart"))
}

/// Remove a cart line.
#[instrument(skip(state, shopper))]
pub async fn remove(
    State(state): State<AppState>,
    mut shopper: Shopper,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let id = ProductId::new(form.product_id);
    ensure_known(&state, shopper.stores.cart.contains(&id), &id)?;
    shopper.stores.cart.remove(&id);
    shopper.save().await?;
    Ok(redirect_back(form.return_to.as_deref(), "/cart"))
}
