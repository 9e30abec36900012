//! Model reference value object (`provider:model`)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a `provider:model` string is malformed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected `provider:model`, got `{0}`")]
pub struct ModelRefParseError(pub String);

/// A model addressed through a named provider (Value Object)
///
/// # Example
///
/// ```
/// use arbiter_domain::ModelRef;
///
/// let model: ModelRef = "openai:gpt-4o".parse().unwrap();
/// assert_eq!(model.provider(), "openai");
/// assert_eq!(model.model(), "gpt-4o");
/// assert_eq!(model.to_string(), "openai:gpt-4o");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelRef {
    provider: String,
    model: String,
}

impl ModelRef {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Justifier used when no `JUSTIFIER_MODEL` is configured
    pub fn default_justifier() -> Self {
        Self::new("openai", "gpt-4o")
    }
}

impl std::fmt::Display for ModelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}

impl std::str::FromStr for ModelRef {
    type Err = ModelRefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Model names may themselves contain ':' (e.g. "ollama:llama3:8b")
        match s.trim().split_once(':') {
            Some((provider, model))
                if !provider.trim().is_empty() && !model.trim().is_empty() =>
            {
                Ok(Self::new(provider.trim(), model.trim()))
            }
            _ => Err(ModelRefParseError(s.to_string())),
        }
    }
}

impl Serialize for ModelRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModelRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
