//! Backend client errors.

use thiserror::Error;

/// Errors that can occur when calling the REST backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Endpoint URL could not be built from the base URL.
    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP request failed (connect, timeout, ...).
    #[error("backend request failed: {0}")]
    Request(String),

    /// Backend answered with a non-success status.
    #[error("backend returned {status} for {path}")]
    Status { status: u16, path: String },

    /// Response body did not match the expected shape.
    #[error("backend response error: {0}")]
    Decode(String),
}

impl BackendError {
    /// Short message for a failed edit, shown above the form.
    #[must_use]
    pub fn change_failed_message(&self) -> String {
        match self {
            Self::Status { status, .. } => {
                format!("The library backend rejected the change ({status}).")
            }
            _ => "The library backend could not be reached.".to_string(),
        }
    }
}
