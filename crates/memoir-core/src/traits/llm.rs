//! LLM trait and related types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MemoirResult;
use crate::types::Message;

/// Response from LLM generation.
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    /// Generated text content.
    pub content: Option<String>,
    /// Token usage statistics.
    pub usage: Option<TokenUsage>,
}

impl LlmResponse {
    /// Get the content or an empty string.
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens.
    pub total_tokens: u32,
}

/// Configuration options for LLM generation.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Sampling temperature (0.0 - 2.0).
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Response format.
    pub response_format: Option<ResponseFormat>,
}

/// Response format for LLM output.
#[derive(Debug, Clone)]
pub enum ResponseFormat {
    /// Plain text response.
    Text,
    /// JSON object response.
    Json,
}

/// Core LLM trait - all LLM providers implement this.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Generate a response from the LLM.
    async fn generate(
        &self,
        messages: &[Message],
        options: Option<GenerationOptions>,
    ) -> MemoirResult<LlmResponse>;

    /// Get the model name.
    fn model_name(&self) -> &str;

    /// Check if this model supports JSON mode.
    fn supports_json_mode(&self) -> bool {
        true
    }
}

/// LLM configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name/identifier.
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key (if not using environment variable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL for API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}
