//! Console sign-in.
//!
//! There is no credential backend: sign-in matches the email against a
//! known list of identities and checks one shared demo password. The list
//! defaults to two built-in users and can be replaced by a YAML file.
//!
//! ```yaml
//! users:
//!   - id: "1"
//!     name: Admin User
//!     email: admin@library.com
//!     role: admin
//!   - id: "2"
//!     name: John Doe
//!     email: john.doe@library.com
//!     role: operator
//!     avatar: https://example.org/john.png
//! ```

mod error;

pub use error::AuthError;

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};

use elmis_core::{Email, UserRole};

use crate::models::{CurrentUser, UserId};

/// Default demo password.
pub const DEFAULT_DEMO_PASSWORD: &str = "password";

/// On-disk layout of the users file.
#[derive(Debug, Deserialize)]
struct UsersFile {
    users: Vec<CurrentUser>,
}

/// Known console identities plus the shared demo password.
#[derive(Clone)]
pub struct UserDirectory {
    users: Vec<CurrentUser>,
    password: SecretString,
}

impl std::fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectory")
            .field("users", &self.users.len())
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl UserDirectory {
    /// Create a directory from an explicit user list.
    #[must_use]
    pub fn new(users: Vec<CurrentUser>, password: SecretString) -> Self {
        Self { users, password }
    }

    /// The two built-in demo identities: one admin, one operator.
    #[must_use]
    pub fn builtin(password: SecretString) -> Self {
        let users = [
            ("1", "Admin User", "admin@library.com", UserRole::Admin),
            ("2", "John Doe", "john.doe@library.com", UserRole::Operator),
        ]
        .into_iter()
        .filter_map(|(id, name, email, role)| {
            Some(CurrentUser {
                id: UserId::new(id),
                name: name.to_string(),
                email: Email::parse(email).ok()?,
                role,
                avatar: None,
            })
        })
        .collect();

        Self::new(users, password)
    }

    /// Load identities from a YAML users file.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the file cannot be read, does not parse, or
    /// lists no users.
    pub fn from_yaml_file(path: &Path, password: SecretString) -> Result<Self, AuthError> {
        let content = std::fs::read_to_string(path).map_err(|source| AuthError::DirectoryRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content, password)
    }

    /// Parse identities from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the text does not parse or lists no users.
    pub fn from_yaml_str(yaml: &str, password: SecretString) -> Result<Self, AuthError> {
        let file: UsersFile = serde_yaml::from_str(yaml)?;
        if file.users.is_empty() {
            return Err(AuthError::EmptyDirectory);
        }
        Ok(Self::new(file.users, password))
    }

    /// All known identities.
    #[must_use]
    pub fn users(&self) -> &[CurrentUser] {
        &self.users
    }

    /// Look an identity up by email, ignoring case and surrounding spaces.
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<&CurrentUser> {
        self.users.iter().find(|u| u.email.matches(email))
    }

    /// Check `email` and `password` and return the matching identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or
    /// the password is wrong.
    #[instrument(skip(self, password))]
    pub fn authenticate(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let user = self.find_by_email(email).ok_or_else(|| {
            debug!("Unknown email");
            AuthError::InvalidCredentials
        })?;

        if password != self.password.expose_secret() {
            debug!("Wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user.clone())
    }
}
