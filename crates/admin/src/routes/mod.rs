//! HTTP route handlers for the console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /                       - Redirect to /dashboard or /login
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Check credentials and sign in
//! POST /logout                 - Sign out
//!
//! # Pages (any signed-in role)
//! GET  /dashboard              - Overview
//! GET  /books                  - Book catalog (?title=&author= search)
//! GET  /reviews                - Member reviews
//! GET  /rentals                - Rental ledger
//! POST /rentals/{id}/return    - Mark returned (admin)
//! POST /rentals/{id}/overdue   - Mark overdue (admin)
//! POST /rentals/{id}/delete    - Delete rental (admin)
//! GET  /profile                - Signed-in user
//!
//! # Pages (admin only)
//! GET  /employees              - Staff directory
//! GET  /employees/new          - New employee form
//! POST /employees              - Add employee
//! GET  /employees/{id}/edit    - Edit employee form
//! POST /employees/{id}         - Save employee
//! POST /employees/{id}/delete  - Remove employee
//! GET  /announcements          - Staff notices
//! GET  /announcements/new      - New announcement form
//! POST /announcements          - Post announcement
//! GET  /announcements/{id}/edit - Edit announcement form
//! POST /announcements/{id}     - Save announcement
//! POST /announcements/{id}/delete - Delete announcement
//! GET  /reports                - Rental summary
//!
//! # Misc
//! GET  /unauthorized           - Access denied (403)
//! POST /theme/toggle           - Flip light/dark, redirect back
//!
//! # API (JSON, any signed-in role)
//! GET  /api/session            - Current session
//! PUT  /api/preferences/theme  - Set theme
//! GET  /api/reports/rental-summary - Rental counts (admin)
//! ```
//!
//! Anything else renders the not-found page.

pub mod announcements;
pub mod api;
pub mod auth;
pub mod books;
pub mod dashboard;
pub mod employees;
pub mod errors;
pub mod profile;
pub mod rentals;
pub mod reports;
pub mod reviews;
pub mod theme;

use axum::{Router, response::Redirect, routing::get};

use crate::middleware::OptionalSession;
use crate::navigation::AppRoute;
use crate::state::AppState;

/// Create all routes for the console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/", get(root))
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(books::router())
        .merge(reviews::router())
        .merge(rentals::router())
        .merge(profile::router())
        .merge(employees::router())
        .merge(announcements::router())
        .merge(reports::router())
        .merge(errors::router())
        .merge(theme::router())
        .merge(api::router())
        .fallback(errors::not_found)
}

/// Build the routed application with state attached.
pub fn app(state: AppState) -> Router {
    routes().with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// GET /
async fn root(OptionalSession(session): OptionalSession) -> Redirect {
    let target = if session.is_authenticated() {
        AppRoute::Dashboard
    } else {
        AppRoute::Login
    };
    Redirect::to(target.path())
}
