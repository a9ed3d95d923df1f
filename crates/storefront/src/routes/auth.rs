//! Registration and login route handlers.
//!
//! Registration is forwarded to the external sign-up endpoint; the storefront
//! keeps no accounts of its own. Login happens on the external login page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::middleware::{NavCounts, Shopper};
use crate::services::Registration;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Registration form data.
///
/// Implements `Debug` manually to redact the passwords.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl std::fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

/// Per-field problems found before submitting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
    pub confirm_password: Option<&'static str>,
}

impl FieldErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.confirm_password.is_none()
    }
}

impl RegisterForm {
    /// Check that every field is filled in.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let blank = |value: &str, message| value.trim().is_empty().then_some(message);
        FieldErrors {
            name: blank(&self.name, "Please enter your name"),
            email: blank(&self.email, "Please enter your email address"),
            password: blank(&self.password, "Please enter a password"),
            confirm_password: blank(&self.confirm_password, "Please confirm your password"),
        }
    }
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub registered: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: NavCounts,
    pub registered: bool,
    pub login_url: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: NavCounts,
    pub error: Option<String>,
    pub fields: FieldErrors,
    pub name: String,
    pub email: String,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the login page.
#[instrument(skip(state, shopper))]
pub async fn login_page(
    State(state): State<AppState>,
    shopper: Shopper,
    Query(query): Query<LoginQuery>,
) -> LoginTemplate {
    LoginTemplate {
        nav: shopper.nav(),
        registered: query.registered.is_some(),
        login_url: state.config().login_url.as_ref().map(ToString::to_string),
    }
}

/// Display the registration page.
#[instrument(skip(shopper))]
pub async fn register_page(shopper: Shopper) -> RegisterTemplate {
    RegisterTemplate {
        nav: shopper.nav(),
        error: None,
        fields: FieldErrors::default(),
        name: String::new(),
        email: String::new(),
    }
}

/// Handle registration form submission.
///
/// Blank fields are reported without calling the endpoint. On success the
/// shopper is sent to the login page; otherwise the form is shown again with
/// the endpoint's message.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    shopper: Shopper,
    Form(form): Form<RegisterForm>,
) -> Response {
    let fields = form.validate();
    if !fields.is_empty() {
        return RegisterTemplate {
            nav: shopper.nav(),
            error: None,
            fields,
            name: form.name,
            email: form.email,
        }
        .into_response();
    }

    let registration = Registration {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: SecretString::from(form.password),
        confirm_password: SecretString::from(form.confirm_password),
    };

    match state.registration().register(&registration).await {
        Ok(()) => Redirect::to("/login?registered=1").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            RegisterTemplate {
                nav: shopper.nav(),
                error: Some(e.user_message().to_string()),
                fields: FieldErrors::default(),
                name: registration.name,
                email: registration.email,
            }
            .into_response()
        }
    }
}
