//! Client for the ELMIS REST backend.
//!
//! The backend owns books, employees, rentals, reviews, announcements and
//! report aggregation. The console reads from it to fill its pages and
//! sends admin edits (announcements, employees, rental status) back to it.
//! A failing backend degrades a page, never the session.

mod client;
mod error;
pub mod types;

pub use client::{BackendClient, DEFAULT_PAGE_SIZE};
pub use error::BackendError;
