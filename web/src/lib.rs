//! Axum integration for Staybook services.
//!
//! Handlers form the imperative shell around the reducers:
//!
//! 1. **Extract** the principal, path and body from the request
//! 2. **Dispatch** a command through the domain service
//! 3. **Map** the outcome to a JSON response, or an [`AppError`]
//!
//! This crate holds the pieces every service shares: the error type, the
//! correlation-id layer and the health endpoints.

pub mod error;
pub mod handlers;
pub mod middleware;

pub use error::AppError;
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
