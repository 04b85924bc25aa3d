//! HTTP middleware and extractors for the console.
//!
//! - `auth` - Session extractors that run the route guard

pub mod auth;

pub use auth::{GuardRejection, OptionalSession, RequireAdmin, RequireSession};
