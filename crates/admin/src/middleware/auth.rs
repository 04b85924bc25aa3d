//! Route-guard extractors.
//!
//! Handlers for protected pages take [`RequireSession`]; it resolves the
//! request path to the [`AppRoute`] that owns it, takes a fresh session
//! snapshot and runs the guard before the handler body executes.
//! Handlers that change backend data take [`RequireAdmin`].

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};

use elmis_core::UserRole;

use crate::guard::{self, GuardDecision};
use crate::models::CurrentUser;
use crate::navigation::AppRoute;
use crate::session::Session;
use crate::state::AppState;

/// Extractor that requires a signed-in user allowed on the requested route.
///
/// Page requests are resolved with [`AppRoute::owner_of`], so nested paths
/// take their section's roles. Requests under `/api/` are gated on
/// authentication alone.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSession { user, .. }: RequireSession,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireSession {
    /// The signed-in user.
    pub user: CurrentUser,
    /// Snapshot the guard was evaluated against.
    pub session: Session,
    /// Route the request resolved to.
    pub route: AppRoute,
}

/// Rejection produced when the guard does not render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRejection {
    /// Redirect to the login page (for page requests).
    RedirectToLogin,
    /// Redirect to the access-denied page (for page requests).
    RedirectToUnauthorized,
    /// 401 for API requests.
    Unauthorized,
    /// 403 for API requests.
    Forbidden,
}

impl GuardRejection {
    /// Map a guard decision onto a rejection, or `None` for `Render`.
    #[must_use]
    pub const fn from_decision(decision: GuardDecision, is_api: bool) -> Option<Self> {
        match (decision, is_api) {
            (GuardDecision::Render, _) => None,
            (GuardDecision::RedirectToLogin, false) => Some(Self::RedirectToLogin),
            (GuardDecision::RedirectToLogin, true) => Some(Self::Unauthorized),
            (GuardDecision::AccessDenied, false) => Some(Self::RedirectToUnauthorized),
            (GuardDecision::AccessDenied, true) => Some(Self::Forbidden),
        }
    }
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(AppRoute::Login.path()).into_response(),
            Self::RedirectToUnauthorized => {
                Redirect::to(AppRoute::Unauthorized.path()).into_response()
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Your role does not have access to this resource",
            )
                .into_response(),
        }
    }
}

fn is_api(parts: &Parts) -> bool {
    parts.uri.path().starts_with("/api/")
}

impl<S> FromRequestParts<S> for RequireSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GuardRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let session = state.sessions().snapshot();
        let is_api = is_api(parts);

        let route = AppRoute::owner_of(parts.uri.path());
        let decision = if is_api {
            guard::evaluate(&session, &[])
        } else {
            guard::evaluate_route(&session, route)
        };

        if let Some(rejection) = GuardRejection::from_decision(decision, is_api) {
            tracing::debug!(path = %parts.uri.path(), ?decision, "Guard rejected request");
            return Err(rejection);
        }

        // Render without a user only happens on unprotected routes, which
        // never take this extractor.
        let user = session.user().cloned().ok_or(if is_api {
            GuardRejection::Unauthorized
        } else {
            GuardRejection::RedirectToLogin
        })?;

        Ok(Self {
            user,
            session,
            route,
        })
    }
}

/// Extractor that additionally requires the admin role, whatever the route.
///
/// Used by handlers that write to the backend.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub RequireSession);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GuardRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = RequireSession::from_request_parts(parts, state).await?;

        let decision = guard::evaluate(&auth.session, &[UserRole::Admin]);
        if let Some(rejection) = GuardRejection::from_decision(decision, is_api(parts)) {
            tracing::debug!(path = %parts.uri.path(), role = %auth.user.role, "Admin required");
            return Err(rejection);
        }

        Ok(Self(auth))
    }
}

/// Extractor that yields the current session snapshot without gating.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(OptionalSession(session): OptionalSession) -> impl IntoResponse {
///     match session.user() {
///         Some(u) => format!("Hello, {}!", u.name),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Session);

impl<S> FromRequestParts<S> for OptionalSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(AppState::from_ref(state).sessions().snapshot()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_mapping() {
        assert_eq!(GuardRejection::from_decision(GuardDecision::Render, false), None);
        assert_eq!(GuardRejection::from_decision(GuardDecision::Render, true), None);
        assert_eq!(
            GuardRejection::from_decision(GuardDecision::RedirectToLogin, false),
            Some(GuardRejection::RedirectToLogin)
        );
        assert_eq!(
            GuardRejection::from_decision(GuardDecision::RedirectToLogin, true),
            Some(GuardRejection::Unauthorized)
        );
        assert_eq!(
            GuardRejection::from_decision(GuardDecision::AccessDenied, false),
            Some(GuardRejection::RedirectToUnauthorized)
        );
        assert_eq!(
            GuardRejection::from_decision(GuardDecision::AccessDenied, true),
            Some(GuardRejection::Forbidden)
        );
    }

    #[test]
    fn test_rejection_responses() {
        let response = GuardRejection::RedirectToLogin.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/login");

        let response = GuardRejection::RedirectToUnauthorized.into_response();
        assert_eq!(response.headers()["location"], "/unauthorized");

        assert_eq!(
            GuardRejection::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GuardRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
