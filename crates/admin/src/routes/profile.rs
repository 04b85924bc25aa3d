//! Profile page for the signed-in user.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, routing::get};

use crate::components::{PageChrome, UserView};
use crate::filters;
use crate::middleware::RequireSession;
use crate::state::AppState;

/// Build the profile router.
pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(show))
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub chrome: PageChrome,
    pub profile: UserView,
    pub user_id: String,
}

/// GET /profile
pub async fn show(auth: RequireSession) -> ProfileTemplate {
    ProfileTemplate {
        chrome: PageChrome::new(&auth.session, auth.route),
        profile: UserView::from(&auth.user),
        user_id: auth.user.id.to_string(),
    }
}
