//! Announcements page and editor (admin only).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use elmis_core::AnnouncementId;

use crate::backend::BackendError;
use crate::backend::types::{Announcement, AnnouncementInput};
use crate::components::{PageChrome, PageQuery, Pager, format};
use crate::filters;
use crate::middleware::{OptionalSession, RequireAdmin, RequireSession};
use crate::navigation::AppRoute;
use crate::state::AppState;

use super::errors;

/// Build the announcements router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/announcements", get(index).post(create))
        .route("/announcements/new", get(new_announcement))
        .route("/announcements/{id}", post(update))
        .route("/announcements/{id}/edit", get(edit))
        .route("/announcements/{id}/delete", post(delete))
}

/// Announcement card view for templates.
#[derive(Debug, Clone)]
pub struct AnnouncementCard {
    pub id: String,
    pub title: String,
    pub content: String,
    pub posted: String,
}

impl From<&Announcement> for AnnouncementCard {
    fn from(announcement: &Announcement) -> Self {
        Self {
            id: announcement.id.to_string(),
            title: announcement.title.clone(),
            content: announcement.content.clone(),
            posted: format::date(announcement.created_at),
        }
    }
}

/// Announcements page template.
#[derive(Template, WebTemplate)]
#[template(path = "announcements/index.html")]
pub struct AnnouncementsTemplate {
    pub chrome: PageChrome,
    pub announcements: Vec<AnnouncementCard>,
    pub pager: Pager,
    pub error: Option<String>,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "announcements/form.html")]
pub struct AnnouncementFormTemplate {
    pub chrome: PageChrome,
    pub heading: &'static str,
    /// Where the form posts.
    pub action: String,
    pub title: String,
    pub content: String,
    pub error: Option<String>,
}

/// Announcement form data.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl AnnouncementForm {
    /// Trimmed input, or a message when a field is blank.
    fn validate(&self) -> Result<AnnouncementInput, &'static str> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err("Title and content are required.");
        }
        Ok(AnnouncementInput {
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}

/// Staff notices.
///
/// GET /announcements
#[instrument(skip(auth, state))]
pub async fn index(
    auth: RequireSession,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AnnouncementsTemplate {
    render(&auth, &state, query.page, None).await
}

/// Blank announcement form.
///
/// GET /announcements/new
pub async fn new_announcement(RequireAdmin(auth): RequireAdmin) -> AnnouncementFormTemplate {
    AnnouncementFormTemplate {
        chrome: PageChrome::new(&auth.session, auth.route),
        heading: "New announcement",
        action: AppRoute::Announcements.path().to_string(),
        title: String::new(),
        content: String::new(),
        error: None,
    }
}

/// Post a new announcement.
///
/// POST /announcements
#[instrument(skip(auth, state, form))]
pub async fn create(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<AnnouncementForm>,
) -> Response {
    let action = AppRoute::Announcements.path().to_string();
    let result = match form.validate() {
        Ok(input) => state.backend().create_announcement(&input).await,
        Err(message) => {
            return form_page(&auth, "New announcement", action, form, message.to_string());
        }
    };

    match result {
        Ok(announcement) => {
            tracing::info!(id = %announcement.id, "Announcement created");
            Redirect::to(AppRoute::Announcements.path()).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create announcement: {e}");
            form_page(&auth, "New announcement", action, form, e.change_failed_message())
        }
    }
}

/// Edit form, pre-filled from the backend.
///
/// GET /announcements/{id}/edit
#[instrument(skip(auth, state))]
pub async fn edit(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<AnnouncementId>,
) -> Response {
    match state.backend().announcement(id).await {
        Ok(announcement) => AnnouncementFormTemplate {
            chrome: PageChrome::new(&auth.session, auth.route),
            heading: "Edit announcement",
            action: format!("/announcements/{id}"),
            title: announcement.title,
            content: announcement.content,
            error: None,
        }
        .into_response(),
        Err(BackendError::Status { status: 404, .. }) => {
            errors::not_found(OptionalSession(auth.session)).await
        }
        Err(e) => {
            tracing::error!(%id, "Failed to fetch announcement: {e}");
            let page = render(&auth, &state, 0, Some(e.change_failed_message())).await;
            (StatusCode::BAD_GATEWAY, page).into_response()
        }
    }
}

/// Save an edited announcement.
///
/// POST /announcements/{id}
#[instrument(skip(auth, state, form))]
pub async fn update(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<AnnouncementId>,
    Form(form): Form<AnnouncementForm>,
) -> Response {
    let action = format!("/announcements/{id}");
    let result = match form.validate() {
        Ok(input) => state.backend().update_announcement(id, &input).await,
        Err(message) => {
            return form_page(&auth, "Edit announcement", action, form, message.to_string());
        }
    };

    match result {
        Ok(_) => {
            tracing::info!(%id, "Announcement updated");
            Redirect::to(AppRoute::Announcements.path()).into_response()
        }
        Err(e) => {
            tracing::error!(%id, "Failed to update announcement: {e}");
            form_page(&auth, "Edit announcement", action, form, e.change_failed_message())
        }
    }
}

/// Delete an announcement.
///
/// POST /announcements/{id}/delete
#[instrument(skip(auth, state))]
pub async fn delete(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<AnnouncementId>,
) -> Response {
    match state.backend().delete_announcement(id).await {
        Ok(()) => {
            tracing::info!(%id, "Announcement deleted");
            Redirect::to(AppRoute::Announcements.path()).into_response()
        }
        Err(e) => {
            tracing::error!(%id, "Failed to delete announcement: {e}");
            let message = format!("Announcement #{id} could not be deleted.");
            let page = render(&auth, &state, 0, Some(message)).await;
            (StatusCode::BAD_GATEWAY, page).into_response()
        }
    }
}

/// Re-render the form with the submitted values and a message.
fn form_page(
    auth: &RequireSession,
    heading: &'static str,
    action: String,
    form: AnnouncementForm,
    error: String,
) -> Response {
    let page = AnnouncementFormTemplate {
        chrome: PageChrome::new(&auth.session, auth.route),
        heading,
        action,
        title: form.title,
        content: form.content,
        error: Some(error),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
}

async fn render(
    auth: &RequireSession,
    state: &AppState,
    page: u32,
    notice: Option<String>,
) -> AnnouncementsTemplate {
    let chrome = PageChrome::new(&auth.session, auth.route);

    match state.backend().announcements(page).await {
        Ok(page) => AnnouncementsTemplate {
            chrome,
            announcements: page.content.iter().map(AnnouncementCard::from).collect(),
            pager: Pager::from_page(&page),
            error: notice,
        },
        Err(e) => {
            tracing::error!("Failed to fetch announcements: {e}");
            AnnouncementsTemplate {
                chrome,
                announcements: vec![],
                pager: Pager::default(),
                error: Some(
                    "Announcements could not be loaded from the library backend.".to_string(),
                ),
            }
        }
    }
}
