//! Core types for ELMIS.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod role;
pub mod status;
pub mod theme;

pub use email::{Email, EmailError};
pub use id::*;
pub use role::{ParseRoleError, UserRole};
pub use status::RentalStatus;
pub use theme::{ParseThemeError, Theme};
