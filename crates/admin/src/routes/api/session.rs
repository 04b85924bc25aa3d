//! Session snapshot API.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use elmis_core::Theme;

use crate::middleware::RequireSession;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Build the session router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/session", get(show))
}

/// Session as seen by API clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: CurrentUser,
    pub is_authenticated: bool,
    pub theme: Theme,
}

/// Current session.
///
/// GET /api/session
pub async fn show(auth: RequireSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        is_authenticated: auth.session.is_authenticated(),
        theme: auth.session.theme(),
        user: auth.user,
    })
}
