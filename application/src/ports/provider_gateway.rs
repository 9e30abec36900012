//! Provider Gateway port
//!
//! Uniform interface over heterogeneous model backends.

use arbiter_domain::{ArbitrationError, Attachment, ModelRef};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during provider gateway operations.
///
/// Every variant is a provider error: a panel call that returns one aborts
/// the whole arbitration.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider misconfigured: {0}")]
    Configuration(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    /// Tag this failure with the model it happened on
    pub fn into_arbitration_error(self, model: &ModelRef) -> ArbitrationError {
        ArbitrationError::provider(model.provider(), model.model(), self.to_string())
    }
}

/// A model advertised by a provider
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelInfo {
    pub provider: String,
    pub model: String,
    pub supports_attachments: bool,
}

impl ModelInfo {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            supports_attachments: false,
        }
    }

    pub fn with_attachments(mut self, supported: bool) -> Self {
        self.supports_attachments = supported;
        self
    }
}

/// Gateway for model communication
///
/// Implementations (adapters) live in the infrastructure layer. Request
/// timeouts are enforced by the adapter and reported as
/// [`GatewayError::Timeout`].
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Names of all configured providers
    fn providers(&self) -> Vec<String>;

    /// Models one provider can serve
    async fn available_models(&self, provider: &str) -> Result<Vec<ModelInfo>, GatewayError>;

    /// Send a text-only prompt and return the raw completion
    async fn generate(&self, model: &ModelRef, prompt: &str) -> Result<String, GatewayError>;

    /// Send a prompt together with file attachments
    async fn generate_with_attachments(
        &self,
        model: &ModelRef,
        prompt: &str,
        attachments: &[Attachment],
    ) -> Result<String, GatewayError>;

    /// Whether `model` accepts attachments
    fn supports_attachments(&self, model: &ModelRef) -> bool;
}
