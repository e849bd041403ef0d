//! Shared client utilities for API access, configuration, cancellation and
//! errors. Centralizing these keeps network behavior consistent across the
//! auth and risk features. Nothing here logs token material.

pub mod api;
pub mod cancel;
pub mod config;
pub mod errors;

pub use api::ApiClient;
pub use cancel::CancellationToken;
pub use config::{AppConfig, ConfigOverrides};
pub use errors::{AppError, FailureClass};
