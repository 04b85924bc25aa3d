//! Identity of the signed-in console user.

use serde::{Deserialize, Serialize};

use elmis_core::{Email, UserRole};

/// Opaque user identifier.
///
/// Identities come from the user directory, which keys them with short
/// strings (`"1"`, `"2"`), not backend database IDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity record held by the session.
///
/// Stored verbatim in durable storage; `avatar` is omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Directory ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Sign-in email.
    pub email: Email,
    /// Authorization role.
    pub role: UserRole,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl CurrentUser {
    /// Up to two uppercase initials from the display name, for avatar badges.
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }

    /// Returns `true` if the user holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
