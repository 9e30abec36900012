//! OpenAI-compatible chat completions adapter.
//!
//! Works against any backend exposing `POST {base_url}/chat/completions`
//! (OpenAI, Azure OpenAI, OpenRouter, vLLM, Ollama, ...). Image attachments
//! are sent as base64 data URLs; text attachments are inlined.

use super::ProviderAdapter;
use crate::config::FileProviderConfig;
use arbiter_application::ports::provider_gateway::{GatewayError, ModelInfo};
use arbiter_domain::Attachment;
use arbiter_domain::util::truncate_str;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

const MAX_ERROR_BODY_BYTES: usize = 500;

pub struct OpenAiCompatibleAdapter {
    name: String,
    client: Client,
    base_url: String,
    api_key: Option<String>,
    models: Vec<String>,
    attachment_models: Vec<String>,
    max_tokens: u32,
}

impl OpenAiCompatibleAdapter {
    pub fn new(name: impl Into<String>, config: &FileProviderConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Configuration(e.to_string()))?;

        Ok(Self {
            name: name.into(),
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
            models: config.models.clone(),
            attachment_models: config.attachment_models.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn request_body(&self, model: &str, prompt: &str, attachments: &[Attachment]) -> Value {
        let content = if attachments.is_empty() {
            json!(prompt)
        } else {
            let mut parts = vec![json!({"type": "text", "text": prompt})];
            parts.extend(attachments.iter().filter_map(attachment_part));
            Value::Array(parts)
        };

        json!({
            "model": model,
            "messages": [{"role": "user", "content": content}],
            "max_tokens": self.max_tokens,
        })
    }
}

fn attachment_part(attachment: &Attachment) -> Option<Value> {
    if attachment.is_image() {
        return Some(json!({
            "type": "image_url",
            "image_url": {
                "url": format!("data:{};base64,{}", attachment.media_type, attachment.data)
            }
        }));
    }

    if attachment.media_type.starts_with("text/") || attachment.media_type == "application/json" {
        let bytes = STANDARD.decode(&attachment.data).ok()?;
        let text = String::from_utf8_lossy(&bytes);
        return Some(json!({
            "type": "text",
            "text": format!("Attachment {}:\n{}", attachment.name, text)
        }));
    }

    debug!(
        "Skipping attachment {} ({}): unsupported media type",
        attachment.name, attachment.media_type
    );
    None
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else if error.is_connect() {
        GatewayError::ConnectionError(error.to_string())
    } else {
        GatewayError::RequestFailed(error.to_string())
    }
}

/// Pull the assistant text out of a chat completions response
fn extract_text(body: &Value) -> Result<String, GatewayError> {
    let content = &body["choices"][0]["message"]["content"];
    match content {
        Value::String(text) => Ok(text.clone()),
        Value::Array(parts) => Ok(parts
            .iter()
            .filter_map(|p| p["text"].as_str())
            .collect::<Vec<_>>()
            .join("")),
        _ => Err(GatewayError::InvalidResponse(
            "no message content in response".to_string(),
        )),
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatibleAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports_attachments(&self, model: &str) -> bool {
        self.attachment_models.iter().any(|m| m == model)
    }

    async fn available_models(&self) -> Result<Vec<ModelInfo>, GatewayError> {
        Ok(self
            .models
            .iter()
            .map(|m| ModelInfo::new(&self.name, m).with_attachments(self.supports_attachments(m)))
            .collect())
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        attachments: &[Attachment],
    ) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(model, prompt, attachments);
        debug!(
            "POST {} model={} prompt_bytes={} attachments={}",
            url,
            model,
            prompt.len(),
            attachments.len()
        );

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {}: {}",
                status,
                truncate_str(&text, MAX_ERROR_BODY_BYTES)
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        extract_text(&body)
    }
}
