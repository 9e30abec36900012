//! Domain error types

use thiserror::Error;

/// Coarse classification of an [`ArbitrationError`].
///
/// Callers branch on the kind (HTTP status mapping, oracle soft-success
/// conversion) without matching every variant's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Provider,
    Parse,
    Infrastructure,
    CommitmentNotFound,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Provider => "provider",
            ErrorKind::Parse => "parse",
            ErrorKind::Infrastructure => "infrastructure",
            ErrorKind::CommitmentNotFound => "commitment_not_found",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building, running or publishing an arbitration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArbitrationError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Provider {provider} failed for model {model}: {message}")]
    Provider {
        provider: String,
        model: String,
        message: String,
    },

    #[error("Could not parse model output: {0}")]
    Parse(String),

    #[error("Infrastructure failure: {0}")]
    Infrastructure(String),

    #[error("Commitment not found: {0}")]
    CommitmentNotFound(String),
}

impl ArbitrationError {
    pub fn validation(message: impl Into<String>) -> Self {
        ArbitrationError::Validation(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ArbitrationError::Infrastructure(message.into())
    }

    pub fn provider(
        provider: impl Into<String>,
        model: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ArbitrationError::Provider {
            provider: provider.into(),
            model: model.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ArbitrationError::Validation(_) => ErrorKind::Validation,
            ArbitrationError::Provider { .. } => ErrorKind::Provider,
            ArbitrationError::Parse(_) => ErrorKind::Parse,
            ArbitrationError::Infrastructure(_) => ErrorKind::Infrastructure,
            ArbitrationError::CommitmentNotFound(_) => ErrorKind::CommitmentNotFound,
        }
    }

    /// Check if this error came from a model backend
    pub fn is_provider(&self) -> bool {
        self.kind() == ErrorKind::Provider
    }
}
