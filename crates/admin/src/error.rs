//! Unified error handling for the console.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::backend::BackendError;
use crate::models::CurrentUser;

/// Error returned by JSON API handlers.
///
/// Page handlers never fail: they render backend failures as a banner.
#[derive(Debug, Error)]
pub enum AppError {
    /// REST backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Console request error"
            );
        }

        // Don't expose backend details to clients
        let message = match &self {
            Self::Backend(_) => "Library backend unavailable".to_string(),
            Self::Forbidden(_) => self.to_string(),
        };

        (self.status(), message).into_response()
    }
}

/// Set the Sentry user context from the signed-in user.
pub fn set_sentry_user(user: &CurrentUser) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user.id.to_string()),
            email: Some(user.email.to_string()),
            username: Some(user.name.clone()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Forbidden("reports".to_string());
        assert_eq!(err.to_string(), "Forbidden: reports");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::Forbidden("reports".to_string())
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Backend(BackendError::Status {
                status: 500,
                path: "/api/books".to_string()
            })
            .into_response()
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
