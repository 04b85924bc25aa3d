//! ELMIS admin console library.
//!
//! This crate provides the console as a library, allowing it to be tested
//! and reused by the CLI.
//!
//! # Layers
//!
//! - [`storage`] - Durable key/value storage backing the session
//! - [`session`] - The process-wide session and its store
//! - [`guard`] / [`navigation`] - Route gating and the route table
//! - [`services`] - User directory and sign-in
//! - [`backend`] - Read-only REST backend client
//! - [`routes`] - Axum handlers and askama pages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod guard;
pub mod middleware;
pub mod models;
pub mod navigation;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;
