//! JSON API endpoints for the console.

pub mod preferences;
pub mod reports;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(session::router())
        .merge(preferences::router())
        .merge(reports::router())
}
