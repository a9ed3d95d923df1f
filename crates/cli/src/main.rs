//! Shutterbay CLI - catalog inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # Report duplicate ids and inconsistent product data
//! sb-cli catalog check crates/storefront/data/products.json
//!
//! # Preview a listing page
//! sb-cli catalog browse crates/storefront/data/products.json --brand Canon --sort priceHighToLow
//! ```
//!
//! # Commands
//!
//! - `catalog check` - Validate a catalog file
//! - `catalog browse` - Filter, sort and paginate a catalog file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use shutterbay_core::catalog::{BaseFilter, FilterParams, FilterSpec, SortOrder};

mod commands;

#[derive(Parser)]
#[command(name = "sb-cli")]
#[command(author, version, about = "Shutterbay CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Report duplicate ids and inconsistent product data
    Check {
        /// Path to the catalog JSON file
        path: PathBuf,
    },
    /// Print one listing page
    Browse {
        /// Path to the catalog JSON file
        path: PathBuf,

        #[command(flatten)]
        filters: BrowseArgs,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Products per page
        #[arg(long, default_value = "12")]
        per_page: NonZeroUsize,
    },
}

#[derive(Args)]
struct BrowseArgs {
    /// Navigation gender filter
    #[arg(long)]
    gender: Option<String>,

    /// Navigation category filter
    #[arg(long)]
    category: Option<String>,

    /// Navigation product type; seeds --kind
    #[arg(long = "type")]
    base_type: Option<String>,

    /// Product type; pass an empty value to clear the navigation type
    #[arg(long)]
    kind: Option<String>,

    #[arg(long)]
    size: Option<String>,

    /// Variation color (lens mount)
    #[arg(long)]
    color: Option<String>,

    #[arg(long)]
    brand: Option<String>,

    /// Only products on sale
    #[arg(long)]
    sale: bool,

    /// Sort order (`soldQuantityHighToLow`, `discountHighToLow`, `priceHighToLow`, `priceLowToHigh`)
    #[arg(long)]
    sort: Option<SortOrder>,

    /// Minimum price
    #[arg(long)]
    min: Option<Decimal>,

    /// Maximum price
    #[arg(long)]
    max: Option<Decimal>,
}

impl BrowseArgs {
    fn into_params(self, page: usize) -> FilterParams {
        FilterParams {
            base: BaseFilter {
                gender: self.gender,
                category: self.category,
                kind: self.base_type,
            },
            kind: self.kind,
            size: self.size,
            color: self.color,
            brand: self.brand,
            sale_only: self.sale,
            sort: self.sort.unwrap_or_default(),
            min: self.min,
            max: self.max,
            page,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Check { path } => commands::check::run(&path).await?,
            CatalogAction::Browse {
                path,
                filters,
                page,
                per_page,
            } => {
                let spec = FilterSpec::from_params(filters.into_params(page));
                commands::browse::run(&path, &spec, per_page).await?;
            }
        },
    }
    Ok(())
}
