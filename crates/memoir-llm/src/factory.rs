//! Factory for creating LLM providers.

use std::sync::Arc;

use memoir_core::config::{LlmProvider, LlmProviderConfig};
use memoir_core::error::MemoirResult;
use memoir_core::traits::{Llm, LlmConfig};

use crate::anthropic::AnthropicLlm;
use crate::mock::MockLlm;
use crate::ollama::OllamaLlm;

/// Factory for creating LLM providers.
pub struct LlmFactory;

impl LlmFactory {
    /// Create an LLM provider from the given configuration.
    pub fn create(provider: LlmProvider, config: LlmConfig) -> MemoirResult<Arc<dyn Llm>> {
        match provider {
            LlmProvider::Anthropic => {
                let llm = AnthropicLlm::new(config)?;
                Ok(Arc::new(llm))
            }
            LlmProvider::Ollama => {
                let llm = OllamaLlm::new(config)?;
                Ok(Arc::new(llm))
            }
            // Dev provider: answers every call with an empty JSON object
            LlmProvider::Mock => Ok(Arc::new(MockLlm::always("{}"))),
        }
    }

    /// Create a provider from a memoir `llm` config section.
    pub fn from_config(config: &LlmProviderConfig) -> MemoirResult<Arc<dyn Llm>> {
        Self::create(config.provider, config.config.clone())
    }

    /// Create an Anthropic provider with default configuration.
    pub fn anthropic() -> MemoirResult<Arc<dyn Llm>> {
        Self::create(LlmProvider::Anthropic, LlmConfig::default())
    }

    /// Create an Anthropic provider with a specific model.
    pub fn anthropic_with_model(model: impl Into<String>) -> MemoirResult<Arc<dyn Llm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create(LlmProvider::Anthropic, config)
    }

    /// Create an Ollama provider with default configuration.
    pub fn ollama() -> MemoirResult<Arc<dyn Llm>> {
        Self::create(LlmProvider::Ollama, LlmConfig::default())
    }

    /// Create an Ollama provider with a specific model.
    pub fn ollama_with_model(model: impl Into<String>) -> MemoirResult<Arc<dyn Llm>> {
        let config = LlmConfig {
            model: model.into(),
            ..Default::default()
        };
        Self::create(LlmProvider::Ollama, config)
    }
}
