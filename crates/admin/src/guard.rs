//! Route guard: decides whether a navigation renders or redirects.

use elmis_core::UserRole;

use crate::navigation::AppRoute;
use crate::session::Session;

/// Outcome of guarding a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested view.
    Render,
    /// Not signed in: go to the login view. The requested path is dropped.
    RedirectToLogin,
    /// Signed in with a role outside the view's allowed set.
    AccessDenied,
}

impl GuardDecision {
    /// Where the browser should end up, or `None` to render in place.
    #[must_use]
    pub const fn redirect_target(self) -> Option<AppRoute> {
        match self {
            Self::Render => None,
            Self::RedirectToLogin => Some(AppRoute::Login),
            Self::AccessDenied => Some(AppRoute::Unauthorized),
        }
    }
}

/// Decide a navigation from the authentication flag, the user's role and
/// the target's allowed roles.
///
/// An empty `allowed` set admits any signed-in role.
#[must_use]
pub fn decide(
    is_authenticated: bool,
    role: Option<UserRole>,
    allowed: &[UserRole],
) -> GuardDecision {
    if !is_authenticated {
        return GuardDecision::RedirectToLogin;
    }
    match role {
        _ if allowed.is_empty() => GuardDecision::Render,
        Some(role) if allowed.contains(&role) => GuardDecision::Render,
        _ => GuardDecision::AccessDenied,
    }
}

/// Guard `session` navigating to a target with `allowed` roles.
#[must_use]
pub fn evaluate(session: &Session, allowed: &[UserRole]) -> GuardDecision {
    decide(session.is_authenticated(), session.role(), allowed)
}

/// Guard `session` navigating to `route`. Unprotected routes always render.
#[must_use]
pub fn evaluate_route(session: &Session, route: AppRoute) -> GuardDecision {
    if route.is_protected() {
        evaluate(session, route.allowed_roles())
    } else {
        GuardDecision::Render
    }
}
