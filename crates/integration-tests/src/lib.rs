//! Integration tests for Shutterbay.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shutterbay-integration-tests
//! ```
//!
//! Each test spawns the full storefront router on an ephemeral port, backed
//! by the in-memory session store and a small fixed catalog. The account
//! registration endpoint is replaced by a local stub so no outside service
//! is contacted.
//!
//! # Test Categories
//!
//! - `storefront` - Listing, cart, wishlist and compare flows
//! - `registration` - Account registration form

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::Value;
use shutterbay_core::catalog::Catalog;
use shutterbay_storefront::config::StorefrontConfig;
use shutterbay_storefront::state::AppState;
use url::Url;

/// Catalog served by every test app: 5 products, 2 per page.
pub const CATALOG: &str = r##"[
    {"id": "1", "name": "EOS R6", "category": "camera", "type": "Mirrorless Cameras",
     "gender": "unisex", "sale": true, "price": 80, "originPrice": 100, "brand": "Canon",
     "sold": 10, "quantity": 20, "quantityPurchase": 1, "sizes": ["64GB", "128GB"],
     "variation": [{"color": "pink", "colorCode": "#F4C5BF"}]},
    {"id": "2", "name": "Z6", "category": "camera", "type": "Mirrorless Cameras",
     "gender": "unisex", "price": 60, "originPrice": 60, "brand": "Nikon",
     "sold": 30, "quantity": 40, "sizes": ["64GB"],
     "variation": [{"color": "red", "colorCode": "#DB4444"}]},
    {"id": "3", "name": "RF 50mm", "category": "camera", "type": "Lenses",
     "gender": "unisex", "price": 20, "originPrice": 25, "brand": "Canon",
     "sold": 50, "quantity": 60, "variation": [{"color": "pink", "colorCode": "#F4C5BF"}]},
    {"id": "4", "name": "Alpha 7", "category": "camera", "type": "Mirrorless Cameras",
     "gender": "unisex", "price": 90, "originPrice": 90, "brand": "Sony",
     "sold": 5, "quantity": 10},
    {"id": "5", "name": "Travel Tripod", "category": "camera", "type": "Tripods",
     "gender": "unisex", "price": 40, "originPrice": 50, "brand": "Leica",
     "sold": 1, "quantity": 9}
]"##;

/// A running storefront and a cookie-keeping client pointed at it.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Start the storefront with a registration stub that always answers
    /// `status` with `body`.
    pub async fn spawn(status: StatusCode, body: Value) -> Self {
        let signup_url = spawn_signup_stub(status, body).await;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            catalog_path: PathBuf::from("unused.json"),
            products_per_page: NonZeroUsize::new(2).unwrap(),
            signup_url,
            login_url: None,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let state = AppState::new(config, catalog).unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, shutterbay_storefront::app(state))
                .await
                .unwrap();
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self { addr, client }
    }

    /// Start the storefront with a registration stub that accepts everything.
    pub async fn spawn_default() -> Self {
        Self::spawn(StatusCode::CREATED, serde_json::json!({ "id": "u-1" })).await
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// GET `path` and return status and body.
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, String) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.text().await.unwrap())
    }

    /// POST a form to `path` and return the response without following redirects.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }
}

/// Redirect target of a response.
#[must_use]
pub fn location(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

async fn spawn_signup_stub(status: StatusCode, body: Value) -> Url {
    let router = Router::new().route(
        "/signup",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/signup")).unwrap()
}
