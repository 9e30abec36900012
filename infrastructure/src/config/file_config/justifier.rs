//! Justifier configuration from TOML (`[justifier]` section)

use arbiter_application::config::DEFAULT_JUSTIFICATION_PLACEHOLDER;
use arbiter_domain::ModelRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJustifierConfig {
    /// `provider:model` of the model writing the consolidated justification
    pub model: String,
    /// Justification returned when that model fails
    pub placeholder: String,
}

impl Default for FileJustifierConfig {
    fn default() -> Self {
        Self {
            model: ModelRef::default_justifier().to_string(),
            placeholder: DEFAULT_JUSTIFICATION_PLACEHOLDER.to_string(),
        }
    }
}
