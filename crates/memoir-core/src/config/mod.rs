//! Configuration system for memoir.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::dedup::DedupThresholds;
use crate::import::DEFAULT_MAX_DOCUMENT_CHARS;
use crate::session::DEFAULT_HISTORY_CAPACITY;
use crate::traits::LlmConfig;

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Anthropic,
    Ollama,
    Mock,
}

/// Provider configuration with type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    /// Provider type.
    pub provider: LlmProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: LlmConfig,
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Anthropic,
            config: LlmConfig {
                model: "claude-3-5-sonnet-20241022".to_string(),
                ..Default::default()
            },
        }
    }
}

/// Document import configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Characters of document text sent to the extractor before truncation.
    pub max_document_chars: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
        }
    }
}

/// Edit history configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Undo entries kept per session. Zero disables undo.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Main memoir configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoirConfig {
    /// Duplicate pipeline thresholds.
    pub dedup: DedupThresholds,
    /// LLM configuration.
    pub llm: LlmProviderConfig,
    /// Document import configuration.
    pub import: ImportConfig,
    /// Edit history configuration.
    pub history: HistoryConfig,
    /// Whether borderline candidates go to the LLM oracle.
    pub oracle_enabled: bool,
    /// Timeout for a single oracle call, in seconds.
    pub oracle_timeout_secs: u64,
}

impl Default for MemoirConfig {
    fn default() -> Self {
        Self {
            dedup: DedupThresholds::default(),
            llm: LlmProviderConfig::default(),
            import: ImportConfig::default(),
            history: HistoryConfig::default(),
            oracle_enabled: true,
            oracle_timeout_secs: 30,
        }
    }
}

impl MemoirConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::MemoirResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| crate::error::MemoirError::Configuration(e.to_string())),
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| crate::error::MemoirError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| crate::error::MemoirError::Configuration(e.to_string())),
            _ => Err(crate::error::MemoirError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(model) = std::env::var("MEMOIR_LLM_MODEL") {
            config.llm.config.model = model;
        }
        if let Ok(provider) = std::env::var("MEMOIR_LLM_PROVIDER") {
            config.llm.provider = match provider.to_lowercase().as_str() {
                "ollama" => LlmProvider::Ollama,
                "mock" => LlmProvider::Mock,
                _ => LlmProvider::Anthropic,
            };
        }
        if let Ok(api_key) = std::env::var("ANTHROPIC_API_KEY") {
            config.llm.config.api_key = Some(api_key);
        }
        if let Ok(enabled) = std::env::var("MEMOIR_ORACLE_ENABLED") {
            config.oracle_enabled = matches!(enabled.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        config
    }

    /// Default config file location (`~/.memoir/config.toml`).
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".memoir"))
            .unwrap_or_else(|| PathBuf::from(".memoir"))
            .join("config.toml")
    }

    /// Load from the default config file, falling back to defaults when
    /// the file does not exist.
    pub fn load_or_default() -> crate::error::MemoirResult<Self> {
        let path = Self::default_config_path();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Timeout for a single oracle call.
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> MemoirConfigBuilder {
        MemoirConfigBuilder::default()
    }
}

/// Builder for MemoirConfig.
#[derive(Default)]
pub struct MemoirConfigBuilder {
    config: MemoirConfig,
}

impl MemoirConfigBuilder {
    /// Set duplicate pipeline thresholds.
    pub fn dedup(mut self, thresholds: DedupThresholds) -> Self {
        self.config.dedup = thresholds;
        self
    }

    /// Set LLM configuration.
    pub fn llm(mut self, config: LlmProviderConfig) -> Self {
        self.config.llm = config;
        self
    }

    /// Set document import configuration.
    pub fn import(mut self, config: ImportConfig) -> Self {
        self.config.import = config;
        self
    }

    /// Set edit history configuration.
    pub fn history(mut self, config: HistoryConfig) -> Self {
        self.config.history = config;
        self
    }

    /// Enable or disable the oracle tier.
    pub fn oracle_enabled(mut self, enabled: bool) -> Self {
        self.config.oracle_enabled = enabled;
        self
    }

    /// Set the oracle call timeout in seconds.
    pub fn oracle_timeout_secs(mut self, secs: u64) -> Self {
        self.config.oracle_timeout_secs = secs;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> MemoirConfig {
        self.config
    }
}
