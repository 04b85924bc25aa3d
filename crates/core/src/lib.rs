//! ELMIS Core - Shared types library.
//!
//! This crate provides common types used across all ELMIS components:
//! - `admin` - The locally served admin console (session store, route guard, pages)
//! - `cli` - Command-line tools for inspecting and editing the persisted session
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for entity IDs and emails, plus the role,
//!   theme and rental status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
