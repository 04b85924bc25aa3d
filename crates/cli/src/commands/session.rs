//! `session` commands.

use serde_json::json;

use elmis_admin::session::Session;

use super::{CliError, Context};

/// One-line description of a session.
#[must_use]
pub fn describe(session: &Session) -> String {
    match session.user() {
        Some(user) => format!(
            "Signed in as {} <{}> ({}), theme {}",
            user.name,
            user.email,
            user.role,
            session.theme()
        ),
        None => format!("Signed out, theme {}", session.theme()),
    }
}

/// Print the persisted session.
///
/// # Errors
///
/// Returns `CliError::Encode` if JSON output fails.
pub fn show(ctx: &Context, as_json: bool) -> Result<(), CliError> {
    let session = ctx.sessions.snapshot();
    if as_json {
        let body = json!({
            "user": session.user(),
            "isAuthenticated": session.is_authenticated(),
            "theme": session.theme(),
        });
        tracing::info!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        tracing::info!("{}", describe(&session));
    }
    Ok(())
}

/// Sign in as a known user.
///
/// # Errors
///
/// Returns `CliError::Auth` if the email or password is wrong. The
/// persisted session is left untouched in that case.
pub fn login(ctx: &Context, email: &str, password: &str) -> Result<Session, CliError> {
    let user = ctx.directory.authenticate(email, password)?;
    let session = ctx.sessions.login(user);
    tracing::info!("{}", describe(&session));
    Ok(session)
}

/// Sign out. Signing out twice is harmless.
pub fn logout(ctx: &Context) {
    let session = ctx.sessions.logout();
    tracing::info!("{}", describe(&session));
}
