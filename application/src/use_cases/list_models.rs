//! List Models use case
//!
//! Model discovery across every configured provider. Unlike panel calls,
//! providers are asked concurrently and the answers joined.

use crate::ports::provider_gateway::{ModelInfo, ProviderGateway};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

pub struct ListModelsUseCase<G: ProviderGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: ProviderGateway + 'static> ListModelsUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// All models of all providers, ordered by provider then model.
    ///
    /// A provider that fails to answer contributes nothing.
    pub async fn execute(&self) -> Vec<ModelInfo> {
        let mut join_set = JoinSet::new();

        for provider in self.gateway.providers() {
            let gateway = Arc::clone(&self.gateway);
            join_set.spawn(async move {
                let result = gateway.available_models(&provider).await;
                (provider, result)
            });
        }

        let mut models = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((provider, Ok(found))) => {
                    debug!("Provider {} lists {} models", provider, found.len());
                    models.extend(found);
                }
                Ok((provider, Err(e))) => {
                    warn!("Provider {} failed to list models: {}", provider, e);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        models.sort();
        models
    }
}
