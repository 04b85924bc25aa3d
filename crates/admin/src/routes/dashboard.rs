//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use tracing::instrument;

use elmis_core::RentalStatus;

use crate::backend::types::{Book, BookSearch, Page, Rental};
use crate::components::{PageChrome, format};
use crate::filters;
use crate::middleware::RequireSession;
use crate::state::AppState;

/// Rentals shown in the recent list.
const RECENT_RENTALS: usize = 5;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// Dashboard metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardMetrics {
    pub books: String,
    pub rentals: String,
    pub active_rentals: String,
    pub overdue_rentals: String,
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self {
            books: "0".to_string(),
            rentals: "0".to_string(),
            active_rentals: "0".to_string(),
            overdue_rentals: "0".to_string(),
        }
    }
}

/// Recent rental view for dashboard.
#[derive(Debug, Clone)]
pub struct RecentRentalView {
    pub book: String,
    pub due: String,
    pub status: &'static str,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub chrome: PageChrome,
    pub greeting: String,
    pub metrics: DashboardMetrics,
    pub recent_rentals: Vec<RecentRentalView>,
    pub error: Option<String>,
}

/// Resolve a rental's book title from the loaded catalog page.
fn book_title(books: Option<&Page<Book>>, rental: &Rental) -> String {
    books
        .and_then(|page| page.content.iter().find(|b| b.id == rental.book_id))
        .map_or_else(|| format!("Book #{}", rental.book_id), |b| b.title.clone())
}

fn count_status(rentals: &[Rental], status: RentalStatus) -> usize {
    rentals.iter().filter(|r| r.status == status).count()
}

/// Dashboard page handler.
///
/// GET /dashboard
#[instrument(skip(auth, state))]
pub async fn dashboard(auth: RequireSession, State(state): State<AppState>) -> DashboardTemplate {
    // Fetch catalog and rentals in parallel
    let search = BookSearch::default();
    let (books_result, rentals_result) = tokio::join!(
        state.backend().books(0, &search),
        state.backend().rentals(0)
    );

    let mut metrics = DashboardMetrics::default();
    let mut failed = false;

    let books = match books_result {
        Ok(page) => {
            metrics.books = page.total_elements.to_string();
            Some(page)
        }
        Err(e) => {
            tracing::error!("Failed to fetch books: {e}");
            failed = true;
            None
        }
    };

    let recent_rentals = match rentals_result {
        Ok(page) => {
            metrics.rentals = page.total_elements.to_string();
            // Counts cover the first page only
            metrics.active_rentals = count_status(&page.content, RentalStatus::Rented).to_string();
            metrics.overdue_rentals =
                count_status(&page.content, RentalStatus::Overdue).to_string();
            page.content
                .iter()
                .take(RECENT_RENTALS)
                .map(|rental| RecentRentalView {
                    book: book_title(books.as_ref(), rental),
                    due: format::date(rental.due_date),
                    status: rental.status.label(),
                })
                .collect()
        }
        Err(e) => {
            tracing::error!("Failed to fetch rentals: {e}");
            failed = true;
            vec![]
        }
    };

    DashboardTemplate {
        greeting: format!("Welcome back, {}", auth.user.name),
        chrome: PageChrome::new(&auth.session, auth.route),
        metrics,
        recent_rentals,
        error: failed.then(|| "Some figures could not be loaded from the library backend.".to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_book_title_lookup() {
        let books: Page<Book> = serde_json::from_str(
            r#"{"content": [{"id": 3, "title": "Dune", "author": "Frank Herbert"}]}"#,
        )
        .unwrap();
        let known: Rental =
            serde_json::from_str(r#"{"id": 1, "bookId": 3, "userId": 8}"#).unwrap();
        let unknown: Rental =
            serde_json::from_str(r#"{"id": 2, "bookId": 9, "userId": 8}"#).unwrap();

        assert_eq!(book_title(Some(&books), &known), "Dune");
        assert_eq!(book_title(Some(&books), &unknown), "Book #9");
        assert_eq!(book_title(None, &known), "Book #3");
    }

    #[test]
    fn test_count_status() {
        let rentals: Vec<Rental> = serde_json::from_str(
            r#"[{"id": 1, "bookId": 3, "userId": 8, "status": "OVERDUE"},
                {"id": 2, "bookId": 4, "userId": 8, "status": "RENTED"},
                {"id": 3, "bookId": 5, "userId": 9, "status": "OVERDUE"}]"#,
        )
        .unwrap();
        assert_eq!(count_status(&rentals, RentalStatus::Overdue), 2);
        assert_eq!(count_status(&rentals, RentalStatus::Returned), 0);
    }
}
