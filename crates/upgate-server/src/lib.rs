//! `Upgate` HTTP server.
//!
//! Validates update-check requests, asks the core engine for a decision and
//! returns it signed with the shared API secret.

pub mod config;
pub mod error;
pub mod routes;

pub use config::{Args, RateLimit, ServerConfig};
pub use error::ApiError;
pub use routes::{AppState, build_router};
