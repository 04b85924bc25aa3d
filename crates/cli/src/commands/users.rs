//! `users` commands.

use super::Context;

/// List every known user with their role.
pub fn list(ctx: &Context) {
    for user in ctx.directory.users() {
        tracing::info!(
            "{:<24} {:<10} {}",
            user.email.as_str(),
            user.role.as_str(),
            user.name
        );
    }
    if ctx.config.users_file.is_none() {
        tracing::info!("(built-in users; set ELMIS_USERS_FILE to replace them)");
    }
}
