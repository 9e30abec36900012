//! Provider configuration from TOML (`[providers.<name>]` sections)
//!
//! Every provider speaks the OpenAI-compatible chat completions API:
//!
//! ```toml
//! [providers.openai]
//! base_url = "https://api.openai.com/v1"
//! api_key_env = "OPENAI_API_KEY"
//! models = ["gpt-4o", "gpt-4o-mini"]
//! attachment_models = ["gpt-4o"]
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL of the API, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: Option<String>,
    /// Direct API key (prefer `api_key_env`).
    pub api_key: Option<String>,
    /// Models this provider serves.
    pub models: Vec<String>,
    /// Subset of `models` that accept image attachments.
    pub attachment_models: Vec<String>,
    /// Max tokens per response.
    pub max_tokens: u32,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: None,
            api_key: None,
            models: Vec::new(),
            attachment_models: Vec::new(),
            max_tokens: 4096,
            timeout_secs: 120,
        }
    }
}

impl FileProviderConfig {
    /// The direct key, else the value of `api_key_env`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| {
            self.api_key_env
                .as_deref()
                .and_then(|var| std::env::var(var).ok())
                .filter(|key| !key.is_empty())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_key_wins() {
        let config = FileProviderConfig {
            api_key: Some("sk-direct".into()),
            api_key_env: Some("ARBITER_TEST_UNSET_KEY_VAR".into()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-direct"));
    }

    #[test]
    fn test_missing_env_key_resolves_to_none() {
        let config = FileProviderConfig {
            api_key_env: Some("ARBITER_TEST_UNSET_KEY_VAR".into()),
            ..Default::default()
        };
        assert!(config.resolve_api_key().is_none());
    }
}
