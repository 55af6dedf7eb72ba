//! Error types for memoir operations.
//!
//! This module provides a structured error hierarchy with error codes,
//! suggestions for resolution, and source-error chaining.

use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for memoir operations.
pub type MemoirResult<T> = Result<T, MemoirError>;

/// Main error type for all memoir operations.
#[derive(Error, Debug)]
pub enum MemoirError {
    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        details: HashMap<String, String>,
        suggestion: Option<String>,
    },

    /// Event not found.
    #[error("Event not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        event_id: Option<String>,
    },

    /// LLM operation failed.
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The similarity oracle could not be reached or timed out.
    #[error("Oracle unavailable: {message}")]
    OracleUnavailable {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The similarity oracle answered with output we could not parse.
    #[error("Oracle returned malformed output: {message}")]
    OracleMalformedResponse {
        message: String,
        code: ErrorCode,
    },

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        code: ErrorCode,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network error.
    #[error("Network error: {message}")]
    Network {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValMissingField,
    ValInvalidFormat,

    // Events (EVT_xxx)
    EvtNotFound,

    // LLM (LLM_xxx)
    LlmConnectionFailed,
    LlmGenerationFailed,
    LlmInvalidResponse,

    // Oracle (ORC_xxx)
    OrcUnavailable,
    OrcTimeout,
    OrcMalformedResponse,

    // Parse (PARSE_xxx)
    ParseInvalidJson,
    ParseMissingField,

    // Network (NET_xxx)
    NetTimeout,
    NetConnectionFailed,

    // Cancellation (CNL_xxx)
    CnlCancelled,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValMissingField => "VAL_002",
            ErrorCode::ValInvalidFormat => "VAL_003",
            ErrorCode::EvtNotFound => "EVT_001",
            ErrorCode::LlmConnectionFailed => "LLM_001",
            ErrorCode::LlmGenerationFailed => "LLM_002",
            ErrorCode::LlmInvalidResponse => "LLM_003",
            ErrorCode::OrcUnavailable => "ORC_001",
            ErrorCode::OrcTimeout => "ORC_002",
            ErrorCode::OrcMalformedResponse => "ORC_003",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::ParseMissingField => "PARSE_002",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::NetConnectionFailed => "NET_002",
            ErrorCode::CnlCancelled => "CNL_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl MemoirError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: None,
        }
    }

    /// Create a validation error with suggestion.
    pub fn validation_with_suggestion(
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create a not found error for an event id.
    pub fn not_found(event_id: impl Into<String>) -> Self {
        let id = event_id.into();
        Self::NotFound {
            message: format!("Event with id '{}' not found", id),
            code: ErrorCode::EvtNotFound,
            event_id: Some(id),
        }
    }

    /// Create an LLM error.
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            code: ErrorCode::LlmGenerationFailed,
            source: None,
        }
    }

    /// Create an oracle-unavailable error.
    pub fn oracle_unavailable(message: impl Into<String>) -> Self {
        Self::OracleUnavailable {
            message: message.into(),
            code: ErrorCode::OrcUnavailable,
            source: None,
        }
    }

    /// Create an oracle-unavailable error for a timed-out call.
    pub fn oracle_timeout(timeout: std::time::Duration) -> Self {
        Self::OracleUnavailable {
            message: format!("Oracle call exceeded {}s timeout", timeout.as_secs()),
            code: ErrorCode::OrcTimeout,
            source: None,
        }
    }

    /// Create an oracle-malformed-response error.
    pub fn oracle_malformed(message: impl Into<String>) -> Self {
        Self::OracleMalformedResponse {
            message: message.into(),
            code: ErrorCode::OrcMalformedResponse,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetConnectionFailed,
            source: None,
        }
    }

    /// Create a cancellation error.
    pub fn cancelled() -> Self {
        Self::Cancelled
    }

    /// True when the error came from the similarity oracle tier.
    pub fn is_oracle_failure(&self) -> bool {
        matches!(
            self,
            Self::OracleUnavailable { .. } | Self::OracleMalformedResponse { .. }
        )
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Llm { code, .. } => *code,
            Self::OracleUnavailable { code, .. } => *code,
            Self::OracleMalformedResponse { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Cancelled => ErrorCode::CnlCancelled,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::NotFound { .. } => Some("Please check the event ID and ensure it exists"),
            Self::Llm { .. } => Some("Please check your LLM provider configuration"),
            Self::OracleUnavailable { .. } => {
                Some("The import can proceed without AI adjudication; retry later for better duplicate detection")
            }
            Self::Configuration(_) => Some("Please check your memoir configuration file"),
            _ => None,
        }
    }
}
