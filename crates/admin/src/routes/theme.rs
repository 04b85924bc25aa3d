//! Theme toggle for the header button.

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, header},
    response::Redirect,
    routing::post,
};

use crate::state::AppState;

/// Build the theme router.
pub fn router() -> Router<AppState> {
    Router::new().route("/theme/toggle", post(toggle))
}

/// Flip the theme and go back to the page the button was on.
///
/// POST /theme/toggle
pub async fn toggle(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    let theme = state.sessions().toggle_theme();
    tracing::debug!(%theme, "Theme toggled");
    Redirect::to(&back_target(&headers))
}

/// Path of a same-origin `Referer`, or `/`.
fn back_target(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| {
            let url = url::Url::parse(referer).ok()?;
            let host = headers.get(header::HOST)?.to_str().ok()?;
            let origin = match url.port() {
                Some(port) => format!("{}:{port}", url.host_str()?),
                None => url.host_str()?.to_string(),
            };
            let path = url.path();
            // `//host/...` would leave the console
            let local = path.starts_with('/') && !path.starts_with("//");
            (origin == host && local).then(|| match url.query() {
                Some(query) => format!("{path}?{query}"),
                None => path.to_string(),
            })
        })
        .unwrap_or_else(|| "/".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(referer: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("127.0.0.1:3001"));
        if let Some(referer) = referer {
            headers.insert(header::REFERER, HeaderValue::from_static(referer));
        }
        headers
    }

    #[test]
    fn test_back_to_same_origin_referer() {
        assert_eq!(
            back_target(&headers(Some("http://127.0.0.1:3001/books?page=2"))),
            "/books?page=2"
        );
    }

    #[test]
    fn test_foreign_or_missing_referer_goes_home() {
        assert_eq!(back_target(&headers(Some("https://evil.example/"))), "/");
        assert_eq!(back_target(&headers(Some("not a url"))), "/");
        assert_eq!(back_target(&headers(None)), "/");
        assert_eq!(
            back_target(&headers(Some("http://127.0.0.1:3001//evil.example/x"))),
            "/"
        );
    }
}
