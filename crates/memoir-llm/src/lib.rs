//! memoir-llm - LLM provider implementations for memoir.
//!
//! This crate provides the LLM providers that back memoir's extraction,
//! deduplication, and assistant features.
//!
//! # Supported Providers
//!
//! - **Anthropic** - Claude models via the messages API
//! - **Ollama** (feature: `ollama`) - Local models via Ollama
//! - **Mock** - Scripted responses for tests and offline work
//!
//! # Example
//!
//! ```ignore
//! use memoir_llm::LlmFactory;
//!
//! // Create an Anthropic LLM
//! let llm = LlmFactory::anthropic()?;
//!
//! // Or with a specific model
//! let llm = LlmFactory::anthropic_with_model("claude-3-5-sonnet-20241022")?;
//!
//! // Or from a loaded config file
//! let config = memoir_core::MemoirConfig::load_or_default()?;
//! let llm = LlmFactory::from_config(&config.llm)?;
//! ```

mod anthropic;
mod factory;
mod mock;
mod ollama;

pub use anthropic::AnthropicLlm;
pub use factory::LlmFactory;
pub use mock::MockLlm;
pub use ollama::OllamaLlm;

// Re-export core types for convenience
pub use memoir_core::config::LlmProvider;
pub use memoir_core::traits::{GenerationOptions, Llm, LlmConfig, LlmResponse, ResponseFormat};
