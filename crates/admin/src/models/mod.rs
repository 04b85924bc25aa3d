//! Domain models for the admin console.

pub mod session;
pub mod user;

pub use session::PersistedAuth;
pub use user::{CurrentUser, UserId};
