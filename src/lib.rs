//! Library crate for userdesk.
//!
//! This crate exposes the building blocks of the TUI:
//! - Typed client for the backend's `users` resource (`api`)
//! - Application state, form and update loop (`app`)
//! - CLI/environment configuration (`config`)
//! - Error type of the API client (`error`)
//! - In-memory search over the listed users (`search`)
//! - UI rendering and widgets (`ui`)
//! - Advisory form validation (`validate`)
//!
//! It is used by the `userdesk` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod search;
pub mod ui;
pub mod validate;

// Re-export commonly used items at the crate root for convenience
pub use api::{ApiClient, User};
pub use error::{Error, Result};
