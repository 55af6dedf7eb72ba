//! memoir-core - Core library for memoir.
//!
//! This crate provides the event and timeline types, the duplicate
//! detection engine, the document import pipeline, and the LLM-assisted
//! authoring tools for the memoir life-timeline system.
//!
//! # Example
//!
//! ```ignore
//! use memoir_core::{DedupEngine, ExtractedEvent};
//!
//! let engine = DedupEngine::new(None);
//!
//! // Check one candidate against the existing timeline
//! let result = engine.check_duplicate(&candidate, &existing).await;
//! if result.is_duplicate {
//!     println!("skipping: {}", result.reason);
//! }
//!
//! // Or screen a whole batch with progress reporting
//! let outcome = engine
//!     .deduplicate_with_progress(candidates, &existing, |done, total| {
//!         println!("checked {done}/{total}");
//!     })
//!     .await?;
//! ```

pub mod assist;
pub mod config;
pub mod dedup;
pub mod error;
pub mod import;
pub mod json;
pub mod session;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use assist::{
    Assistant, ConnectionSuggestion, EventEnhancement, EventSuggestion, TimelineDigest,
};
pub use config::{LlmProvider, LlmProviderConfig, MemoirConfig, MemoirConfigBuilder};
pub use dedup::{
    DedupEngine, DedupOutcome, DedupThresholds, DetectionTier, DuplicateCheckResult,
    FlaggedDuplicate, LlmAdjudicator,
};
pub use error::{MemoirError, MemoirResult};
pub use import::{
    DocumentExtraction, DocumentKind, EventExtractor, ImportPipeline, ImportReport, ImportStage,
    ImportedDocument,
};
pub use session::{EditHistory, EventAction, EventUpdate, TimelineSession};
pub use traits::{
    EventSummary, GenerationOptions, Llm, LlmConfig, LlmResponse, OracleJudgment, ResponseFormat,
    SimilarityOracle, TokenUsage,
};
pub use types::{
    EventConnection, ExtractedEvent, Message, MessageRole, SearchFilters, Timeline, TimelineEvent,
    TimelineKind, Visibility, UNKNOWN_DATE,
};
