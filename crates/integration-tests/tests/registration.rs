//! Registration form against a stubbed account service.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use shutterbay_integration_tests::{TestApp, location};

const FORM: [(&str, &str); 4] = [
    ("name", "Ada Lovelace"),
    ("email", "ada@example.com"),
    ("password", "hunter22"),
    ("confirm_password", "hunter22"),
];

#[tokio::test]
async fn test_successful_registration_redirects_to_login() {
    let app = TestApp::spawn_default().await;

    let response = app.post("/register", &FORM).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response).as_deref(), Some("/login?registered=1"));

    let (_, login) = app.get("/login?registered=1").await;
    assert!(login.contains("Registration successful"));
}

#[tokio::test]
async fn test_rejection_message_is_shown() {
    let app = TestApp::spawn(
        StatusCode::BAD_REQUEST,
        json!({ "message": "Email already registered" }),
    )
    .await;

    let response = app.post("/register", &FORM).await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Email already registered"));
    assert!(body.contains("ada@example.com"));
    assert!(!body.contains("hunter22"));
}

#[tokio::test]
async fn test_unexpected_status_shows_generic_message() {
    let app = TestApp::spawn(StatusCode::NOT_FOUND, json!({})).await;

    let body = app.post("/register", &FORM).await.text().await.unwrap();
    assert!(body.contains("Registration failed. Please try again later."));
}

#[tokio::test]
async fn test_blank_fields_never_reach_the_service() {
    let app = TestApp::spawn(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "should not be shown" }),
    )
    .await;

    let body = app
        .post(
            "/register",
            &[
                ("name", ""),
                ("email", "ada@example.com"),
                ("password", "hunter22"),
                ("confirm_password", "hunter22"),
            ],
        )
        .await
        .text()
        .await
        .unwrap();
    assert!(!body.contains("should not be shown"));
}
