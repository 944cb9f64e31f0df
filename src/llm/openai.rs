//! OpenAI-compatible chat completions provider

use super::traits::LlmProvider;
use crate::config::{ConfigError, LlmSettings};
use crate::error::ProviderError;
use crate::network::{HttpClient, HttpRequest};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Chat completions client for OpenAI and API-compatible servers
/// (vLLM, Ollama, LM Studio)
pub struct OpenAiProvider {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
    temperature: Option<f32>,
}

impl OpenAiProvider {
    /// Create a provider from settings
    ///
    /// Fails without an API key unless the base URL points at a local server.
    pub fn new(client: HttpClient, settings: &LlmSettings) -> Result<Self, ConfigError> {
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ConfigError::Invalid {
                name: "llm.base_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if settings.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "llm.model".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        let api_key = settings.api_key.clone().filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            if !is_local(&base_url) {
                return Err(ConfigError::MissingCredential(
                    "llm api_key (OPENAI_API_KEY)".to_string(),
                ));
            }
            debug!("No API key set for local LLM server {}", base_url);
        }

        Ok(Self {
            client,
            base_url,
            api_key,
            model: settings.model.clone(),
            timeout: Duration::from_secs_f64(settings.timeout),
            temperature: settings.temperature,
        })
    }

    fn request_body(&self, system_prompt: &str, user_prompt: &str) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
        });
        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }

    fn parse_response(body: &Value) -> Result<String, ProviderError> {
        let message = body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .ok_or_else(|| ProviderError::Decode("no choices in response".to_string()))?;

        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(content.to_string())
    }
}

fn is_local(base_url: &str) -> bool {
    base_url.contains("localhost") || base_url.contains("127.0.0.1")
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut request = HttpRequest::post(&url)
            .header("Accept", "application/json")
            .json(self.request_body(system_prompt, user_prompt));
        if let Some(ref key) = self.api_key {
            request = request.bearer(key.clone());
        }

        debug!("Calling LLM (model: {})", self.model);
        let response = self.client.execute_with_timeout(request, self.timeout).await?;
        if !response.is_success() {
            warn!("LLM returned HTTP {}", response.status);
            return Err(ProviderError::Http {
                status: response.status,
            });
        }

        let body: Value = serde_json::from_str(&response.text)
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        Self::parse_response(&body)
    }
}
