//! `Upgate` Core Library
//!
//! Decides whether a mobile client must upgrade:
//! - Dotted version comparison (lenient and strict parsing)
//! - Platform classification from the app identifier
//! - Per-platform minimum version and store URL policy
//! - Common error types and tracing setup

pub mod config;
pub mod decision;
pub mod error;
pub mod platform;
pub mod tracing_init;
pub mod version;

pub use config::{EngineConfig, PlatformPolicy};
pub use decision::{UpdateDecision, UpdateEngine, UpdateRequest};
pub use error::{Error, Result};
pub use platform::{Platform, PlatformClassifier, SubstringClassifier};
pub use version::{Version, VersionParsing, compare};
