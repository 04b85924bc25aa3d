//! Sign-in and sign-out handlers.
//!
//! Sign-in checks the submitted email and password against the user
//! directory; there is no backend round trip.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use crate::components::PageChrome;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::OptionalSession;
use crate::navigation::{AppRoute, landing_for};
use crate::state::AppState;

/// Message shown when sign-in is rejected.
const REJECTED_MESSAGE: &str = "Invalid email or password.";

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub chrome: PageChrome,
    pub email: String,
    pub error: Option<String>,
}

/// Render the login form, or skip it when already signed in.
///
/// GET /login
pub async fn login_page(OptionalSession(session): OptionalSession) -> Response {
    if let Some(role) = session.role() {
        return Redirect::to(landing_for(role).path()).into_response();
    }

    LoginTemplate {
        chrome: PageChrome::new(&session, AppRoute::Login),
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// Check credentials and sign in.
///
/// POST /login
#[instrument(skip(state, form), fields(email = %form.email.trim()))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.directory().authenticate(&form.email, &form.password) {
        Ok(user) => {
            set_sentry_user(&user);
            let landing = landing_for(user.role);
            state.sessions().login(user);
            Redirect::to(landing.path()).into_response()
        }
        Err(e) => {
            tracing::warn!("Login rejected: {e}");
            let session = state.sessions().snapshot();
            let page = LoginTemplate {
                chrome: PageChrome::new(&session, AppRoute::Login),
                email: form.email,
                error: Some(REJECTED_MESSAGE.to_string()),
            };
            (StatusCode::UNAUTHORIZED, page).into_response()
        }
    }
}

/// Sign out and return to the login page.
///
/// POST /logout
pub async fn logout(State(state): State<AppState>) -> Redirect {
    state.sessions().logout();
    clear_sentry_user();
    Redirect::to(AppRoute::Login.path())
}
