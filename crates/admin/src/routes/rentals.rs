//! Rentals page and the admin status actions on its rows.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use elmis_core::{RentalId, RentalStatus};

use crate::backend::types::Rental;
use crate::components::{PageChrome, PageQuery, Pager, format};
use crate::filters;
use crate::middleware::{RequireAdmin, RequireSession};
use crate::navigation::AppRoute;
use crate::state::AppState;

/// Build the rentals router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rentals", get(index))
        .route("/rentals/{id}/{action}", post(apply))
}

/// Row action posted from the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalAction {
    Return,
    Overdue,
    Delete,
}

/// Rental row view for templates.
#[derive(Debug, Clone)]
pub struct RentalRow {
    pub id: String,
    pub book_id: String,
    pub user_id: String,
    pub rented: String,
    pub due: String,
    pub returned: String,
    pub status: &'static str,
    /// CSS modifier for the status badge.
    pub status_class: &'static str,
    pub can_return: bool,
    pub can_mark_overdue: bool,
}

impl From<&Rental> for RentalRow {
    fn from(rental: &Rental) -> Self {
        Self {
            id: rental.id.to_string(),
            book_id: rental.book_id.to_string(),
            user_id: rental.user_id.to_string(),
            rented: format::date(rental.rental_date),
            due: format::date(rental.due_date),
            returned: format::date(rental.return_date),
            status: rental.status.label(),
            status_class: status_class(rental.status),
            can_return: rental.status != RentalStatus::Returned,
            can_mark_overdue: rental.status == RentalStatus::Rented,
        }
    }
}

const fn status_class(status: RentalStatus) -> &'static str {
    match status {
        RentalStatus::Rented => "info",
        RentalStatus::Returned => "ok",
        RentalStatus::Overdue => "warn",
    }
}

/// Rentals page template.
#[derive(Template, WebTemplate)]
#[template(path = "rentals/index.html")]
pub struct RentalsTemplate {
    pub chrome: PageChrome,
    pub rentals: Vec<RentalRow>,
    pub pager: Pager,
    pub error: Option<String>,
}

/// Rental ledger.
///
/// GET /rentals
#[instrument(skip(auth, state))]
pub async fn index(
    auth: RequireSession,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> RentalsTemplate {
    render(&auth, &state, query.page, None).await
}

/// Mark a rental returned or overdue, or delete it.
///
/// POST /rentals/{id}/{action}
#[instrument(skip(auth, state))]
pub async fn apply(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path((id, action)): Path<(RentalId, RentalAction)>,
) -> Response {
    let backend = state.backend();
    let result = match action {
        RentalAction::Return => backend.return_rental(id).await.map(drop),
        RentalAction::Overdue => backend.mark_rental_overdue(id).await.map(drop),
        RentalAction::Delete => backend.delete_rental(id).await,
    };

    match result {
        Ok(()) => {
            tracing::info!(%id, ?action, email = %auth.user.email, "Rental updated");
            Redirect::to(AppRoute::Rentals.path()).into_response()
        }
        Err(e) => {
            tracing::error!(%id, ?action, "Failed to update rental: {e}");
            let message = format!("Rental #{id} could not be updated.");
            let page = render(&auth, &state, 0, Some(message)).await;
            (StatusCode::BAD_GATEWAY, page).into_response()
        }
    }
}

/// Load a ledger page. `notice` is shown above the table when set.
async fn render(
    auth: &RequireSession,
    state: &AppState,
    page: u32,
    notice: Option<String>,
) -> RentalsTemplate {
    let chrome = PageChrome::new(&auth.session, auth.route);

    match state.backend().rentals(page).await {
        Ok(page) => RentalsTemplate {
            chrome,
            rentals: page.content.iter().map(RentalRow::from).collect(),
            pager: Pager::from_page(&page),
            error: notice,
        },
        Err(e) => {
            tracing::error!("Failed to fetch rentals: {e}");
            RentalsTemplate {
                chrome,
                rentals: vec![],
                pager: Pager::default(),
                error: Some("Rentals could not be loaded from the library backend.".to_string()),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_overdue_row() {
        let rental: Rental = serde_json::from_str(
            r#"{"id": 4, "bookId": 3, "userId": 8, "dueDate": "2024-03-15T00:00:00", "status": "OVERDUE"}"#,
        )
        .unwrap();
        let row = RentalRow::from(&rental);
        assert_eq!(row.status, "Overdue");
        assert_eq!(row.status_class, "warn");
        assert_eq!(row.due, "2024-03-15");
        assert_eq!(row.returned, "-");
        assert!(row.can_return);
        assert!(!row.can_mark_overdue);
    }

    #[test]
    fn test_action_from_path_segment() {
        let action: RentalAction = serde_json::from_str(r#""overdue""#).unwrap();
        assert_eq!(action, RentalAction::Overdue);
        assert!(serde_json::from_str::<RentalAction>(r#""extend""#).is_err());
    }
}
