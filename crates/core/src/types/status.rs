//! Status enums for backend entities.

use serde::{Deserialize, Serialize};

/// Rental lifecycle status as reported by the backend.
///
/// Transitions happen server-side; the console only displays them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    #[default]
    Rented,
    Returned,
    Overdue,
}

impl RentalStatus {
    /// Human-readable label for tables and badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rented => "Rented",
            Self::Returned => "Returned",
            Self::Overdue => "Overdue",
        }
    }
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
