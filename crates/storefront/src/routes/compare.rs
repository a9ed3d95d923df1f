//! Compare route handlers.
//!
//! At most three products can be compared. Adding a fourth is refused and
//! the shopper lands on the comparison page with a notice.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use shutterbay_core::ProductId;
use shutterbay_core::collections::{COMPARE_CAPACITY, Toggle};
use shutterbay_core::comparison::{Cell, ComparisonTable};
use tracing::instrument;

use super::{ProductForm, ensure_known, redirect_back};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{NavCounts, Shopper};
use crate::state::AppState;

/// Notice shown after a refused add.
const FULL_NOTICE: &str = "full";

/// Query parameters for the comparison page.
#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub notice: Option<String>,
}

/// Comparison page template.
#[derive(Template, WebTemplate)]
#[template(path = "compare/show.html")]
pub struct CompareShowTemplate {
    pub nav: NavCounts,
    pub table: ComparisonTable,
    pub capacity: usize,
    pub full_notice: bool,
}

/// Display the comparison table.
#[instrument(skip(shopper))]
pub async fn show(shopper: Shopper, Query(query): Query<CompareQuery>) -> Result<CompareShowTemplate> {
    let table = ComparisonTable::new(shopper.stores.compare.items())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(CompareShowTemplate {
        nav: shopper.nav(),
        table,
        capacity: COMPARE_CAPACITY,
        full_notice: query.notice.as_deref() == Some(FULL_NOTICE),
    })
}

/// Add a product to the comparison, or remove it if already there.
#[instrument(skip(state, shopper))]
pub async fn toggle(
    State(state): State<AppState>,
    mut shopper: Shopper,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let product = state.product(&form.product_id)?.clone();

    match shopper.stores.compare.toggle(product) {
        Ok(outcome) => {
            shopper.save().await?;
            let message = match outcome {
                Toggle::Added => "Added to compare",
                Toggle::Removed => "Removed from compare",
            };
            add_breadcrumb("compare", message, &[("product_id", form.product_id.as_str())]);
            Ok(redirect_back(form.return_to.as_deref(), "/compare"))
        }
        Err(full) => {
            tracing::info!(product_id = %form.product_id, "{full}");
            Ok(Redirect::to(&format!("/compare?notice={FULL_NOTICE}")))
        }
    }
}

/// Remove a product from the comparison.
#[instrument(skip(state, shopper))]
pub async fn remove(
    State(state): State<AppState>,
    mut shopper: Shopper,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let id = ProductId::new(form.product_id);
    ensure_known(&state, shopper.stores.compare.contains(&id), &id)?;
    shopper.stores.compare.remove(&id);
    shopper.save().await?;
    Ok(redirect_back(form.return_to.as_deref(), "/compare"))
}
