//! Console user roles.

use serde::{Deserialize, Serialize};

/// Error returned when a role string is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid user role: {0}")]
pub struct ParseRoleError(pub String);

/// Role of a console user.
///
/// The set is closed: every protected view is gated on a subset of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, including employees, announcements and reports.
    Admin,
    /// Day-to-day desk work: books, rentals, reviews.
    Operator,
}

impl UserRole {
    /// Every role, in display order.
    pub const ALL: [Self; 2] = [Self::Admin, Self::Operator];

    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Operator => "operator",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "operator" => Ok(Self::Operator),
            _ => Err(ParseRoleError(s.to_owned())),
        }
    }
}
