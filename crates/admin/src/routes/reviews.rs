//! Reviews page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use tracing::instrument;

use crate::backend::types::Review;
use crate::components::{PageChrome, PageQuery, Pager, format};
use crate::filters;
use crate::middleware::RequireSession;
use crate::state::AppState;

/// Build the reviews router.
pub fn router() -> Router<AppState> {
    Router::new().route("/reviews", get(index))
}

/// Review row view for templates.
#[derive(Debug, Clone)]
pub struct ReviewRow {
    pub id: String,
    pub book_id: String,
    pub user_id: String,
    pub rating: u8,
    pub comment: String,
    pub created: String,
}

impl From<&Review> for ReviewRow {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id.to_string(),
            book_id: review.book_id.to_string(),
            user_id: review.user_id.to_string(),
            rating: review.rating,
            comment: format::text(review.comment.as_deref()),
            created: format::date(review.created_at),
        }
    }
}

/// Reviews page template.
#[derive(Template, WebTemplate)]
#[template(path = "reviews/index.html")]
pub struct ReviewsTemplate {
    pub chrome: PageChrome,
    pub reviews: Vec<ReviewRow>,
    pub pager: Pager,
    pub error: Option<String>,
}

/// Member reviews.
///
/// GET /reviews
#[instrument(skip(auth, state))]
pub async fn index(
    auth: RequireSession,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ReviewsTemplate {
    let chrome = PageChrome::new(&auth.session, auth.route);

    match state.backend().reviews(query.page).await {
        Ok(page) => ReviewsTemplate {
            chrome,
            reviews: page.content.iter().map(ReviewRow::from).collect(),
            pager: Pager::from_page(&page),
            error: None,
        },
        Err(e) => {
            tracing::error!("Failed to fetch reviews: {e}");
            ReviewsTemplate {
                chrome,
                reviews: vec![],
                pager: Pager::default(),
                error: Some("Reviews could not be loaded from the library backend.".to_string()),
            }
        }
    }
}
