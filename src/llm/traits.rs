//! LLM provider capability

use crate::error::ProviderError;
use async_trait::async_trait;

/// Text completion backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model identifier for logging
    fn model_name(&self) -> &str;

    /// Complete a single system + user prompt exchange
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ProviderError>;
}
