//! Thin wrappers over the Re-Wrapped REST backend, one function per endpoint.

pub mod analytics;
pub mod auth;
pub mod client;
pub mod events;
pub mod spotify;

pub use analytics::ExportPayload;
pub use auth::{AuthSession, Credentials, Registration};
pub use client::ApiClient;
