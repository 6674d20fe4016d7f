pub mod aggregation;
pub mod api;
pub mod auth;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod ports;
pub mod render;
pub mod types;

pub use api::ApiClient;
pub use config::Config;
pub use error::{ApiError, ApiErrorKind, Result, RewrappedError};
