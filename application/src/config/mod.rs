//! Application-level configuration.
//!
//! - [`ArbiterConfig`] — justifier, placeholder text and commitment lifetime

pub mod arbiter_config;

pub use arbiter_config::{
    ArbiterConfig, DEFAULT_COMMITMENT_MAX_AGE, DEFAULT_JUSTIFICATION_PLACEHOLDER,
};
