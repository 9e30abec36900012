use super::ProviderAdapter;
use arbiter_application::ports::provider_gateway::{GatewayError, ModelInfo, ProviderGateway};
use arbiter_domain::{Attachment, ModelRef};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Routes every `provider:model` to the adapter registered under `provider`.
///
/// An unknown provider is a provider error, so a misconfigured panel fails
/// fast like a backend outage.
pub struct RoutingGateway {
    providers: BTreeMap<String, Arc<dyn ProviderAdapter>>,
}

impl RoutingGateway {
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        let providers = adapters
            .into_iter()
            .map(|adapter| (adapter.name().to_string(), adapter))
            .collect();
        Self { providers }
    }

    fn resolve(&self, provider: &str) -> Result<&dyn ProviderAdapter, GatewayError> {
        self.providers
            .get(provider)
            .map(|p| p.as_ref())
            .ok_or_else(|| {
                GatewayError::ModelNotAvailable(format!("unknown provider '{}'", provider))
            })
    }
}

#[async_trait]
impl ProviderGateway for RoutingGateway {
    fn providers(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }

    async fn available_models(&self, provider: &str) -> Result<Vec<ModelInfo>, GatewayError> {
        self.resolve(provider)?.available_models().await
    }

    async fn generate(&self, model: &ModelRef, prompt: &str) -> Result<String, GatewayError> {
        self.resolve(model.provider())?
            .generate(model.model(), prompt, &[])
            .await
    }

    async fn generate_with_attachments(
        &self,
        model: &ModelRef,
        prompt: &str,
        attachments: &[Attachment],
    ) -> Result<String, GatewayError> {
        self.resolve(model.provider())?
            .generate(model.model(), prompt, attachments)
            .await
    }

    fn supports_attachments(&self, model: &ModelRef) -> bool {
        self.resolve(model.provider())
            .is_ok_and(|p| p.supports_attachments(model.model()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Mock ProviderAdapter --------------------------------------------------

    struct EchoProvider {
        name: String,
        vision: Vec<String>,
    }

    impl EchoProvider {
        fn new(name: &str, vision: &[&str]) -> Arc<dyn ProviderAdapter> {
            Arc::new(Self {
                name: name.to_string(),
                vision: vision.iter().map(|s| s.to_string()).collect(),
            })
        }
    }

    #[async_trait]
    impl ProviderAdapter for EchoProvider {
        fn name(&self) -> &str {
            &self.name
        }

        fn supports_attachments(&self, model: &str) -> bool {
            self.vision.iter().any(|m| m == model)
        }

        async fn available_models(&self) -> Result<Vec<ModelInfo>, GatewayError> {
            Ok(vec![ModelInfo::new(&self.name, "echo")])
        }

        async fn generate(
            &self,
            model: &str,
            prompt: &str,
            attachments: &[Attachment],
        ) -> Result<String, GatewayError> {
            Ok(format!(
                "{}/{} ({} attachments): {}",
                self.name,
                model,
                attachments.len(),
                prompt
            ))
        }
    }

    fn gateway() -> RoutingGateway {
        RoutingGateway::new(vec![
            EchoProvider::new("openai", &["gpt-4o"]),
            EchoProvider::new("local", &[]),
        ])
    }

    #[tokio::test]
    async fn routes_by_provider_name() {
        let gateway = gateway();
        let model: ModelRef = "local:llama3".parse().unwrap();
        let text = gateway.generate(&model, "hi").await.unwrap();
        assert_eq!(text, "local/llama3 (0 attachments): hi");

        let model: ModelRef = "openai:gpt-4o".parse().unwrap();
        let attachments = [Attachment::new("a.png", "image/png", "AAAA")];
        let text = gateway
            .generate_with_attachments(&model, "look", &attachments)
            .await
            .unwrap();
        assert!(text.starts_with("openai/gpt-4o (1 attachments)"));
    }

    #[tokio::test]
    async fn unknown_provider_is_model_not_available() {
        let model: ModelRef = "mistral:large".parse().unwrap();
        let error = gateway().generate(&model, "hi").await.unwrap_err();
        assert!(matches!(error, GatewayError::ModelNotAvailable(_)));
        assert!(!gateway().supports_attachments(&model));
    }

    #[test]
    fn providers_are_listed_in_name_order() {
        assert_eq!(gateway().providers(), vec!["local", "openai"]);
        assert!(gateway().supports_attachments(&"openai:gpt-4o".parse().unwrap()));
        assert!(!gateway().supports_attachments(&"openai:gpt-4o-mini".parse().unwrap()));
    }
}
