//! Access-denied and not-found pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::components::PageChrome;
use crate::filters;
use crate::middleware::OptionalSession;
use crate::navigation::{AppRoute, landing_for};
use crate::state::AppState;

/// Build the error pages router. The not-found page is the fallback.
pub fn router() -> Router<AppState> {
    Router::new().route("/unauthorized", get(unauthorized))
}

/// Error page template.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub chrome: PageChrome,
    pub code: u16,
    pub message: &'static str,
    /// Where the "go back" link points.
    pub home: &'static str,
}

fn error_page(
    OptionalSession(session): OptionalSession,
    route: AppRoute,
    status: StatusCode,
    message: &'static str,
) -> Response {
    let home = session
        .role()
        .map_or(AppRoute::Login, landing_for)
        .path();

    let page = ErrorTemplate {
        chrome: PageChrome::new(&session, route),
        code: status.as_u16(),
        message,
        home,
    };
    (status, page).into_response()
}

/// GET /unauthorized
pub async fn unauthorized(session: OptionalSession) -> Response {
    error_page(
        session,
        AppRoute::Unauthorized,
        StatusCode::FORBIDDEN,
        "Your role does not have access to that page.",
    )
}

/// Fallback for unknown paths.
pub async fn not_found(session: OptionalSession) -> Response {
    error_page(
        session,
        AppRoute::NotFound,
        StatusCode::NOT_FOUND,
        "The page you are looking for does not exist.",
    )
}
