//! Business logic services for the console.
//!
//! # Services
//!
//! - `auth` - Local user directory and demo-password sign-in

pub mod auth;

pub use auth::{AuthError, UserDirectory};
