//! Persisted shape of the authentication pair.
//!
//! Stored under [`crate::storage::keys::AUTH`] as camelCase JSON:
//!
//! ```json
//! {"user": {"id": "1", "name": "Admin User", "email": "admin@library.com", "role": "admin"},
//!  "isAuthenticated": true}
//! ```

use serde::{Deserialize, Serialize};

use super::user::CurrentUser;

/// The `{user, isAuthenticated}` pair written on login.
///
/// `user` is optional on the way in so that inconsistent payloads
/// (`{"user": null, "isAuthenticated": true}`) parse and can be rejected
/// explicitly instead of surfacing as a serde error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAuth {
    /// The signed-in identity.
    #[serde(default)]
    pub user: Option<CurrentUser>,
    /// Always `true` when written by the console.
    #[serde(default)]
    pub is_authenticated: bool,
}

impl PersistedAuth {
    /// Build the pair written by a login.
    #[must_use]
    pub const fn signed_in(user: CurrentUser) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
        }
    }

    /// Returns the user if the pair is consistent (user present and flagged
    /// authenticated).
    #[must_use]
    pub fn into_user(self) -> Option<CurrentUser> {
        if self.is_authenticated { self.user } else { None }
    }
}
