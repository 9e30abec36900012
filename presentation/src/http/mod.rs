//! HTTP surface: health, model discovery, inline ranking and the oracle adapter.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::router;
pub use state::AppState;
