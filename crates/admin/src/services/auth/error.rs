//! Sign-in error types.

use thiserror::Error;

/// Errors that can occur while loading the directory or signing in.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately does not say which.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The users file could not be read.
    #[error("failed to read users file {path}: {source}")]
    DirectoryRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The users file is not valid YAML for a user list.
    #[error("invalid users file: {0}")]
    DirectoryParse(#[from] serde_yaml::Error),

    /// The users file lists nobody.
    #[error("users file lists no users")]
    EmptyDirectory,
}
