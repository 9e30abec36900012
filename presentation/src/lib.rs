//! Presentation layer for arbiter-quorum
//!
//! This crate contains CLI definitions, the HTTP surface and
//! progress reporters.

pub mod cli;
pub mod http;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use http::{ApiError, AppState, router};
pub use progress::reporter::TracingProgress;
