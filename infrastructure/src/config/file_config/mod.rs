//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; [`FileConfig::to_arbiter_config`]
//! turns them into the application's runtime settings.

mod commitments;
mod justifier;
mod providers;
mod server;
mod storage;

pub use commitments::{FILE_BACKEND, FileCommitmentsConfig, MEMORY_BACKEND};
pub use justifier::FileJustifierConfig;
pub use providers::FileProviderConfig;
pub use server::FileServerConfig;
pub use storage::{FileEvidenceConfig, FileLoggingConfig, FilePublisherConfig};

use arbiter_application::ArbiterConfig;
use arbiter_domain::{ConfigIssue, ConfigIssueCode, ModelRef, ModelRefParseError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServerConfig,
    pub justifier: FileJustifierConfig,
    pub commitments: FileCommitmentsConfig,
    pub evidence: FileEvidenceConfig,
    pub publisher: FilePublisherConfig,
    pub logging: FileLoggingConfig,
    /// Providers by name; the name is the `provider` half of `provider:model`
    pub providers: BTreeMap<String, FileProviderConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Justifier
        match self.justifier.model.parse::<ModelRef>() {
            Ok(justifier) => {
                if !self.providers.is_empty() && !self.providers.contains_key(justifier.provider()) {
                    issues.push(ConfigIssue::warning(
                        ConfigIssueCode::UnknownJustifierProvider,
                        format!(
                            "justifier.model: provider '{}' has no [providers.{}] section; every justification will fall back to the placeholder",
                            justifier.provider(),
                            justifier.provider()
                        ),
                    ));
                }
            }
            Err(e) => issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidJustifier,
                format!("justifier.model: {}", e),
            )),
        }

        // 2. Commitments
        let backend = self.commitments.backend.as_str();
        if backend != MEMORY_BACKEND && backend != FILE_BACKEND {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::UnknownCommitmentBackend,
                format!(
                    "commitments.backend: unknown value '{}', expected '{}' or '{}'",
                    backend, MEMORY_BACKEND, FILE_BACKEND
                ),
            ));
        }
        if self.commitments.max_age_secs == 0 || self.commitments.purge_interval_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroCommitmentInterval,
                "commitments.max_age_secs and commitments.purge_interval_secs must be positive",
            ));
        }

        // 3. Providers
        if self.providers.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoProviders,
                "no [providers.<name>] sections configured; every arbitration will fail",
            ));
        }
        for (name, provider) in &self.providers {
            if provider.models.is_empty() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::ProviderWithoutModels,
                    format!("providers.{}: no models listed", name),
                ));
            }
            if provider.api_key.is_none() && provider.api_key_env.is_none() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::MissingApiKey,
                    format!("providers.{}: neither api_key nor api_key_env is set", name),
                ));
            }
        }

        issues
    }

    /// Runtime settings for the use cases
    pub fn to_arbiter_config(&self) -> Result<ArbiterConfig, ModelRefParseError> {
        Ok(ArbiterConfig::default()
            .with_justifier(self.justifier.model.parse()?)
            .with_placeholder(self.justifier.placeholder.clone())
            .with_commitment_max_age(Duration::from_secs(self.commitments.max_age_secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_domain::Severity;

    fn codes(issues: &[ConfigIssue]) -> Vec<ConfigIssueCode> {
        issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[server]
bind = "0.0.0.0:9000"

[justifier]
model = "anthropic:claude-sonnet-4"

[commitments]
backend = "file"
dir = "/var/lib/arbiter/commitments"
max_age_secs = 86400

[evidence]
root = "/srv/evidence"

[providers.anthropic]
base_url = "https://api.anthropic.com/v1"
api_key_env = "ANTHROPIC_API_KEY"
models = ["claude-sonnet-4"]
attachment_models = ["claude-sonnet-4"]
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.commitments.backend, FILE_BACKEND);
        assert_eq!(config.commitments.purge_interval_secs, 3600);
        assert_eq!(config.providers["anthropic"].timeout_secs, 120);
        assert!(config.validate().is_empty());

        let runtime = config.to_arbiter_config().unwrap();
        assert_eq!(runtime.justifier.provider(), "anthropic");
        assert_eq!(runtime.commitment_max_age, Duration::from_secs(86400));
    }

    #[test]
    fn test_default_config_only_warns() {
        let issues = FileConfig::default().validate();
        assert_eq!(codes(&issues), vec![ConfigIssueCode::NoProviders]);
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let toml_str = r#"
[justifier]
model = "gpt-4o"

[commitments]
backend = "redis"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).map(|i| i.code).collect();
        assert_eq!(
            errors,
            vec![
                ConfigIssueCode::InvalidJustifier,
                ConfigIssueCode::UnknownCommitmentBackend
            ]
        );
        assert!(config.to_arbiter_config().is_err());
    }

    #[test]
    fn test_provider_warnings() {
        let toml_str = r#"
[justifier]
model = "openai:gpt-4o"

[providers.local]
base_url = "http://localhost:11434/v1"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            codes(&config.validate()),
            vec![
                ConfigIssueCode::UnknownJustifierProvider,
                ConfigIssueCode::ProviderWithoutModels,
                ConfigIssueCode::MissingApiKey
            ]
        );
    }
}
