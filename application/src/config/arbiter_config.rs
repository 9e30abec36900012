//! Runtime configuration threaded through the use cases.

use arbiter_domain::ModelRef;
use std::time::Duration;

/// Justification used when the justifier model fails
pub const DEFAULT_JUSTIFICATION_PLACEHOLDER: &str =
    "Justification unavailable: the justifier model did not respond.";

/// Unrevealed commitments older than this are purged
pub const DEFAULT_COMMITMENT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Settings fixed at process start.
///
/// Built once from the file configuration and handed to every use case
/// that needs it; request handling never reads configuration on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbiterConfig {
    pub justifier: ModelRef,
    pub justification_placeholder: String,
    pub commitment_max_age: Duration,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            justifier: ModelRef::default_justifier(),
            justification_placeholder: DEFAULT_JUSTIFICATION_PLACEHOLDER.to_string(),
            commitment_max_age: DEFAULT_COMMITMENT_MAX_AGE,
        }
    }
}

impl ArbiterConfig {
    pub fn with_justifier(mut self, justifier: ModelRef) -> Self {
        self.justifier = justifier;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.justification_placeholder = placeholder.into();
        self
    }

    pub fn with_commitment_max_age(mut self, max_age: Duration) -> Self {
        self.commitment_max_age = max_age;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_justifier() {
        let config = ArbiterConfig::default();
        assert_eq!(config.justifier.to_string(), "openai:gpt-4o");
        assert_eq!(config.commitment_max_age, DEFAULT_COMMITMENT_MAX_AGE);
    }
}
