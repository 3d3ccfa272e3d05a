//! # Gateway Server
//!
//! HTTP server for the companion gateway.
//!
//! This crate provides:
//! - Axum router with the chat completion and title endpoints
//! - Error mapping to the `{error, details?, kind}` body
//! - Permissive CORS for the browser front end
//! - Health and Prometheus metrics endpoints
//! - Graceful shutdown handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod state;

// Re-export main types
pub use error::{ApiError, ServerError};
pub use routes::create_router;
pub use server::Server;
pub use state::AppState;
