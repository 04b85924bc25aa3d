//! Reports page (admin only).

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use tracing::instrument;

use crate::backend::types::RentalSummary;
use crate::components::PageChrome;
use crate::filters;
use crate::middleware::RequireSession;
use crate::state::AppState;

/// Build the reports router.
pub fn router() -> Router<AppState> {
    Router::new().route("/reports", get(index))
}

/// Rental summary view for templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryView {
    pub total_books: u64,
    pub rented_books: u64,
    pub overdue_books: u64,
    /// Share of the catalog currently out, as a whole percentage.
    pub utilization: u64,
}

impl From<RentalSummary> for SummaryView {
    fn from(summary: RentalSummary) -> Self {
        let utilization = summary
            .rented_books
            .saturating_mul(100)
            .checked_div(summary.total_books)
            .unwrap_or(0);
        Self {
            total_books: summary.total_books,
            rented_books: summary.rented_books,
            overdue_books: summary.overdue_books,
            utilization,
        }
    }
}

/// Reports page template.
#[derive(Template, WebTemplate)]
#[template(path = "reports/index.html")]
pub struct ReportsTemplate {
    pub chrome: PageChrome,
    pub summary: SummaryView,
    pub error: Option<String>,
}

/// Rental summary report.
///
/// GET /reports
#[instrument(skip(auth, state))]
pub async fn index(auth: RequireSession, State(state): State<AppState>) -> ReportsTemplate {
    let chrome = PageChrome::new(&auth.session, auth.route);

    match state.backend().rental_summary().await {
        Ok(summary) => ReportsTemplate {
            chrome,
            summary: SummaryView::from(summary),
            error: None,
        },
        Err(e) => {
            tracing::error!("Failed to fetch rental summary: {e}");
            ReportsTemplate {
                chrome,
                summary: SummaryView::default(),
                error: Some("The report could not be loaded from the library backend.".to_string()),
            }
        }
    }
}
