//! Ollama LLM provider implementation.

use async_trait::async_trait;

use memoir_core::error::{MemoirError, MemoirResult};
#[cfg(feature = "ollama")]
use memoir_core::traits::ResponseFormat;
use memoir_core::traits::{GenerationOptions, Llm, LlmConfig, LlmResponse};
#[cfg(feature = "ollama")]
use memoir_core::types::MessageRole;
use memoir_core::types::Message;

#[cfg(feature = "ollama")]
use ollama_rs::{
    generation::chat::{ChatMessage, ChatMessageRequest, MessageRole as OllamaRole},
    Ollama,
};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.1:8b";

/// Ollama LLM provider for local models.
pub struct OllamaLlm {
    #[cfg(feature = "ollama")]
    client: Ollama,
    config: LlmConfig,
}

impl OllamaLlm {
    /// Create a new Ollama LLM provider.
    pub fn new(config: LlmConfig) -> MemoirResult<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

        // Parse host and port from base_url
        let url = url::Url::parse(&base_url)
            .map_err(|e| MemoirError::Configuration(format!("Invalid Ollama URL: {}", e)))?;

        let host = url.host_str().unwrap_or("localhost").to_string();
        let port = url.port().unwrap_or(11434);

        #[cfg(feature = "ollama")]
        let client = Ollama::new(format!("http://{}", host), port);
        #[cfg(not(feature = "ollama"))]
        let _ = (host, port);

        let mut config = config;
        if config.model.is_empty() {
            config.model = DEFAULT_OLLAMA_MODEL.to_string();
        }

        Ok(Self {
            #[cfg(feature = "ollama")]
            client,
            config,
        })
    }

    #[cfg(feature = "ollama")]
    fn message_to_ollama(msg: &Message) -> ChatMessage {
        ChatMessage {
            role: match msg.role {
                MessageRole::System => OllamaRole::System,
                MessageRole::User => OllamaRole::User,
                MessageRole::Assistant => OllamaRole::Assistant,
            },
            content: msg.content.clone(),
            images: None,
        }
    }
}

#[async_trait]
impl Llm for OllamaLlm {
    #[cfg(feature = "ollama")]
    async fn generate(
        &self,
        messages: &[Message],
        options: Option<GenerationOptions>,
    ) -> MemoirResult<LlmResponse> {
        let options = options.unwrap_or_default();

        let mut ollama_messages: Vec<ChatMessage> =
            messages.iter().map(Self::message_to_ollama).collect();

        // Local models need the JSON requirement spelled out in the prompt
        if matches!(options.response_format, Some(ResponseFormat::Json)) {
            if let Some(last) = ollama_messages.last_mut() {
                last.content
                    .push_str("\n\nPlease respond with valid JSON only.");
            }
        }

        let request = ChatMessageRequest::new(self.config.model.clone(), ollama_messages);

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| MemoirError::llm(format!("Ollama API error: {}", e)))?;

        let content = response.message.map(|m| m.content);

        Ok(LlmResponse {
            content,
            usage: None,
        })
    }

    #[cfg(not(feature = "ollama"))]
    async fn generate(
        &self,
        _messages: &[Message],
        _options: Option<GenerationOptions>,
    ) -> MemoirResult<LlmResponse> {
        Err(MemoirError::Configuration(
            "Ollama support not compiled in. Enable the 'ollama' feature.".to_string(),
        ))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn supports_json_mode(&self) -> bool {
        // Enforced by prompt, not by the API
        true
    }
}
