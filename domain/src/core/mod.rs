//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelRef`] — a `provider:model` pair addressing one backend model
//! - [`error::ArbitrationError`] — the tagged error carried through every layer

pub mod error;
pub mod model;
