//! Display formatting for backend values.

use chrono::NaiveDateTime;

/// Placeholder for absent values.
pub const MISSING: &str = "-";

/// `2024-03-15` style date, or a dash.
#[must_use]
pub fn date(value: Option<NaiveDateTime>) -> String {
    value.map_or_else(|| MISSING.to_string(), |d| d.format("%Y-%m-%d").to_string())
}

/// Optional text, or a dash.
#[must_use]
pub fn text(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(MISSING)
        .to_string()
}

/// Optional number, or a dash.
#[must_use]
pub fn number<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| MISSING.to_string(), |n| n.to_string())
}
