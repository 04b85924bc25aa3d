//! User preferences API handlers.

use axum::{Json, Router, extract::State, routing::put};
use serde::{Deserialize, Serialize};

use elmis_core::Theme;

use crate::{middleware::RequireSession, state::AppState};

/// Build the preferences router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/preferences/theme", put(save_theme))
}

/// Request and response body for the theme preference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThemePreference {
    pub theme: Theme,
}

/// Save the theme preference.
///
/// PUT /api/preferences/theme
///
/// An unknown theme name is rejected by the JSON extractor with 422.
pub async fn save_theme(
    _auth: RequireSession,
    State(state): State<AppState>,
    Json(body): Json<ThemePreference>,
) -> Json<ThemePreference> {
    let session = state.sessions().set_theme(body.theme);
    Json(ThemePreference {
        theme: session.theme(),
    })
}
