//! UI theme preference.

use serde::{Deserialize, Serialize};

/// Error returned when a theme string is neither `light` nor `dark`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid theme: {0}")]
pub struct ParseThemeError(pub String);

/// Console color theme.
///
/// Independent of authentication; defaults to [`Theme::Dark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Returns the opposite theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Returns the stored/CSS name of the theme.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ParseThemeError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn test_toggle_is_an_involution() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn test_parse() {
        assert_eq!("light".parse(), Ok(Theme::Light));
        assert_eq!("dark".parse(), Ok(Theme::Dark));
        assert!("Dark".parse::<Theme>().is_err());
        assert!("\"dark\"".parse::<Theme>().is_err());
    }
}
