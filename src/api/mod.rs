//! Typed gateway to the backend's `users` resource.
//!
//! [`ApiClient`] turns method calls into HTTP requests and JSON bodies back
//! into [`User`] records. The wire work goes through the [`Transport`] trait
//! so tests can swap in a fake.

pub mod client;
pub mod model;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::ApiClient;
pub use model::{DeleteOutcome, HealthStatus, User, UserPayload};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
