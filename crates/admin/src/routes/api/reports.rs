//! Report data API.

use axum::{Json, Router, extract::State, routing::get};

use crate::backend::types::RentalSummary;
use crate::error::AppError;
use crate::guard::{self, GuardDecision};
use crate::middleware::RequireSession;
use crate::navigation::AppRoute;
use crate::state::AppState;

/// Build the reports API router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/reports/rental-summary", get(rental_summary))
}

/// Rental summary as JSON, for the same roles that may open the reports page.
///
/// GET /api/reports/rental-summary
pub async fn rental_summary(
    auth: RequireSession,
    State(state): State<AppState>,
) -> Result<Json<RentalSummary>, AppError> {
    let decision = guard::evaluate(&auth.session, AppRoute::Reports.allowed_roles());
    if decision != GuardDecision::Render {
        return Err(AppError::Forbidden(AppRoute::Reports.title().to_string()));
    }

    Ok(Json(state.backend().rental_summary().await?))
}
