//! Account registration API client.
//!
//! Posts the sign-up form as JSON to the configured endpoint. The endpoint
//! answers 2xx on success, and 400 or 500 with a `{ "message": ... }` body
//! that is shown to the shopper as-is.

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Shown when the endpoint gives no message of its own.
pub const GENERIC_FAILURE: &str = "Registration failed. Please try again later.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when calling the registration endpoint.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The endpoint rejected the submission (400).
    #[error("{0}")]
    Rejected(String),

    /// The endpoint failed while handling the submission (500).
    #[error("{0}")]
    Server(String),

    /// Any other status, or a 400/500 without a readable message.
    #[error("unexpected status {0}")]
    UnexpectedStatus(StatusCode),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl RegistrationError {
    /// Text to show on the form.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected(message) | Self::Server(message) => message,
            Self::UnexpectedStatus(_) | Self::Http(_) => GENERIC_FAILURE,
        }
    }
}

/// A sign-up submission.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    confirm_password: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the registration endpoint.
#[derive(Clone)]
pub struct RegistrationClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl RegistrationClient {
    /// Create a client posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(endpoint: Url) -> Result<Self, RegistrationError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// The endpoint this client posts to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Submit a registration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] unless the endpoint answers 2xx.
    #[tracing::instrument(skip_all, fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<(), RegistrationError> {
        let body = RegistrationBody {
            name: &registration.name,
            email: &registration.email,
            password: registration.password.expose_secret(),
            confirm_password: registration.confirm_password.expose_secret(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("Registration accepted");
            return Ok(());
        }

        if status != StatusCode::BAD_REQUEST && status != StatusCode::INTERNAL_SERVER_ERROR {
            tracing::warn!(%status, "Unexpected registration response");
            return Err(RegistrationError::UnexpectedStatus(status));
        }

        let Ok(ErrorBody { message }) = response.json::<ErrorBody>().await else {
            tracing::warn!(%status, "Registration error without message");
            return Err(RegistrationError::UnexpectedStatus(status));
        };

        if status == StatusCode::BAD_REQUEST {
            tracing::info!(%message, "Registration rejected");
            Err(RegistrationError::Rejected(message))
        } else {
            tracing::warn!(%message, "Registration endpoint failed");
            Err(RegistrationError::Server(message))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, Router, http::StatusCode as AxumStatus, routing::post};
    use serde_json::{Value, json};

    use super::*;

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/signup")).unwrap()
    }

    fn registration() -> Registration {
        Registration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: SecretString::from("hunter22"),
            confirm_password: SecretString::from("hunter22"),
        }
    }

    async fn respond_with(status: AxumStatus, body: Value) -> RegistrationClient {
        let router = Router::new().route(
            "/signup",
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
        RegistrationClient::new(serve(router).await).unwrap()
    }

    #[tokio::test]
    async fn test_sends_camel_case_json() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::default();
        let captured = Arc::clone(&seen);
        let router = Router::new().route(
            "/signup",
            post(move |Json(body): Json<Value>| {
                let captured = Arc::clone(&captured);
                async move {
                    *captured.lock().unwrap() = Some(body);
                    AxumStatus::CREATED
                }
            }),
        );
        let client = RegistrationClient::new(serve(router).await).unwrap();

        client.register(&registration()).await.unwrap();

        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(
            body,
            json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "hunter22",
                "confirmPassword": "hunter22",
            })
        );
    }

    #[tokio::test]
    async fn test_bad_request_message_is_verbatim() {
        let client = respond_with(
            AxumStatus::BAD_REQUEST,
            json!({"message": "Email already in use"}),
        )
        .await;
        let err = client.register(&registration()).await.unwrap_err();
        assert!(matches!(err, RegistrationError::Rejected(_)));
        assert_eq!(err.user_message(), "Email already in use");
    }

    #[tokio::test]
    async fn test_server_error_message_is_verbatim() {
        let client = respond_with(
            AxumStatus::INTERNAL_SERVER_ERROR,
            json!({"message": "Database unavailable"}),
        )
        .await;
        let err = client.register(&registration()).await.unwrap_err();
        assert!(matches!(err, RegistrationError::Server(_)));
        assert_eq!(err.user_message(), "Database unavailable");
    }

    #[tokio::test]
    async fn test_other_status_is_generic() {
        let client = respond_with(AxumStatus::NOT_FOUND, json!({"message": "nope"})).await;
        let err = client.register(&registration()).await.unwrap_err();
        assert!(matches!(err, RegistrationError::UnexpectedStatus(_)));
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn test_missing_message_is_generic() {
        let client = respond_with(AxumStatus::BAD_REQUEST, json!({"error": "x"})).await;
        let err = client.register(&registration()).await.unwrap_err();
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_generic() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = Url::parse(&format!("http://{addr}/signup")).unwrap();
        let client = RegistrationClient::new(endpoint).unwrap();
        let err = client.register(&registration()).await.unwrap_err();
        assert!(matches!(err, RegistrationError::Http(_)));
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }
}
