//! Model provider adapters and the gateway routing between them.

pub mod openai;
pub mod routing;

use crate::config::FileProviderConfig;
use arbiter_application::ports::provider_gateway::{GatewayError, ModelInfo};
use arbiter_domain::Attachment;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

pub use openai::OpenAiCompatibleAdapter;
pub use routing::RoutingGateway;

/// One backend, addressed by its configured provider name
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn name(&self) -> &str;

    fn supports_attachments(&self, model: &str) -> bool;

    async fn available_models(&self) -> Result<Vec<ModelInfo>, GatewayError>;

    /// Send a prompt; `attachments` is empty for text-only calls
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        attachments: &[Attachment],
    ) -> Result<String, GatewayError>;
}

/// Build a routing gateway with one adapter per `[providers.<name>]` section
pub fn build_gateway(
    providers: &BTreeMap<String, FileProviderConfig>,
) -> Result<RoutingGateway, GatewayError> {
    let adapters = providers
        .iter()
        .map(|(name, config)| {
            OpenAiCompatibleAdapter::new(name, config)
                .map(|adapter| Arc::new(adapter) as Arc<dyn ProviderAdapter>)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RoutingGateway::new(adapters))
}
