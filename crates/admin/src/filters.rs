//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders a 0-5 rating as filled and empty stars.
///
/// Usage in templates: `{{ review.rating|stars }}`
#[askama::filter_fn]
pub fn stars(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(star_bar(&value.to_string()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=5
fn star_bar(raw: &str) -> String {
    let filled = raw
        .trim()
        .parse::<f64>()
        .map_or(0, |rating| rating.round().clamp(0.0, 5.0) as usize);
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_bar() {
        assert_eq!(star_bar("4"), "★★★★☆");
        assert_eq!(star_bar("4.6"), "★★★★★");
        assert_eq!(star_bar("9"), "★★★★★");
        assert_eq!(star_bar("-1"), "☆☆☆☆☆");
        assert_eq!(star_bar("n/a"), "☆☆☆☆☆");
    }
}
