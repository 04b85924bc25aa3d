//! `theme` commands.

use elmis_core::Theme;

use super::Context;

/// Flip between light and dark.
pub fn toggle(ctx: &Context) {
    let theme = ctx.sessions.toggle_theme();
    tracing::info!("Theme is now {theme}");
}

/// Set a specific theme.
pub fn set(ctx: &Context, theme: Theme) {
    let session = ctx.sessions.set_theme(theme);
    tracing::info!("Theme is now {}", session.theme());
}
