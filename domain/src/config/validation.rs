//! Structured findings produced when a configuration file is checked.
//!
//! ```
//! use arbiter_domain::config::{ConfigIssue, ConfigIssueCode, Severity};
//!
//! let issue = ConfigIssue::warning(ConfigIssueCode::ProviderWithoutModels, "openai lists no models");
//! assert_eq!(issue.severity, Severity::Warning);
//! assert!(!issue.is_error());
//! ```

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the server cannot start with this configuration.
    Error,
    /// Non-fatal: the server starts but some requests will fail.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `justifier.model` is not a `provider:model` pair.
    InvalidJustifier,
    /// The justifier's provider has no `[providers.<name>]` section.
    UnknownJustifierProvider,
    /// `commitments.backend` is neither `memory` nor `file`.
    UnknownCommitmentBackend,
    /// `commitments.max_age_secs` or `purge_interval_secs` is zero.
    ZeroCommitmentInterval,
    /// No providers are configured at all.
    NoProviders,
    /// A provider section lists no models.
    ProviderWithoutModels,
    /// A provider has neither `api_key` nor a resolvable `api_key_env`.
    MissingApiKey,
}

impl ConfigIssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigIssueCode::InvalidJustifier => "invalid_justifier",
            ConfigIssueCode::UnknownJustifierProvider => "unknown_justifier_provider",
            ConfigIssueCode::UnknownCommitmentBackend => "unknown_commitment_backend",
            ConfigIssueCode::ZeroCommitmentInterval => "zero_commitment_interval",
            ConfigIssueCode::NoProviders => "no_providers",
            ConfigIssueCode::ProviderWithoutModels => "provider_without_models",
            ConfigIssueCode::MissingApiKey => "missing_api_key",
        }
    }
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{}] {}: {}", level, self.code.as_str(), self.message)
    }
}
