//! Book catalog page with title/author search.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use tracing::instrument;

use serde::Deserialize;

use crate::backend::types::{Book, BookSearch};
use crate::components::{PageChrome, Pager, format};
use crate::filters;
use crate::middleware::RequireSession;
use crate::state::AppState;

/// Build the books router.
pub fn router() -> Router<AppState> {
    Router::new().route("/books", get(index))
}

/// `?page=&title=&author=` query of the catalog page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BooksQuery {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
}

/// Book row view for templates.
#[derive(Debug, Clone)]
pub struct BookRow {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: String,
    pub year: String,
    pub available: String,
    pub rating: String,
    pub reviews: String,
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        let available = match (book.available_quantity, book.quantity) {
            (Some(available), Some(total)) => format!("{available} / {total}"),
            (available, _) => format::number(available),
        };

        Self {
            id: book.id.to_string(),
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: format::text(book.isbn.as_deref()),
            category: format::text(book.category.as_ref().map(|c| c.name.as_str())),
            year: format::number(book.publication_year),
            available,
            rating: book
                .avg_rating
                .map_or_else(|| format::MISSING.to_string(), |r| format!("{r:.1}")),
            reviews: format::number(book.total_reviews),
        }
    }
}

/// Books page template.
#[derive(Template, WebTemplate)]
#[template(path = "books/index.html")]
pub struct BooksTemplate {
    pub chrome: PageChrome,
    pub books: Vec<BookRow>,
    pub pager: Pager,
    /// Search form values, echoed back.
    pub search: BookSearch,
    pub error: Option<String>,
}

impl BooksTemplate {
    /// Search field value for the form.
    #[must_use]
    pub fn title_filter(&self) -> &str {
        self.search.title.as_deref().unwrap_or_default()
    }

    /// Search field value for the form.
    #[must_use]
    pub fn author_filter(&self) -> &str {
        self.search.author.as_deref().unwrap_or_default()
    }
}

/// Book catalog.
///
/// GET /books
#[instrument(skip(auth, state))]
pub async fn index(
    auth: RequireSession,
    State(state): State<AppState>,
    Query(query): Query<BooksQuery>,
) -> BooksTemplate {
    let chrome = PageChrome::new(&auth.session, auth.route);
    let search = BookSearch::new(&query.title, &query.author);

    match state.backend().books(query.page, &search).await {
        Ok(page) => BooksTemplate {
            chrome,
            books: page.content.iter().map(BookRow::from).collect(),
            pager: Pager::from_page(&page).with_query(&search.pairs()),
            search,
            error: None,
        },
        Err(e) => {
            tracing::error!("Failed to fetch books: {e}");
            BooksTemplate {
                chrome,
                books: vec![],
                pager: Pager::default(),
                search,
                error: Some("Books could not be loaded from the library backend.".to_string()),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_book_row() {
        let book: Book = serde_json::from_str(
            r#"{"id": 7, "title": "Dune", "author": "Frank Herbert", "quantity": 4,
                "availableQuantity": 1, "avgRating": 4.26, "category": {"id": 1, "name": "Sci-Fi"}}"#,
        )
        .unwrap();
        let row = BookRow::from(&book);
        assert_eq!(row.id, "7");
        assert_eq!(row.available, "1 / 4");
        assert_eq!(row.rating, "4.3");
        assert_eq!(row.category, "Sci-Fi");
        assert_eq!(row.isbn, "-");
        assert_eq!(row.year, "-");
    }
}
