//! Similarity oracle trait for borderline duplicate adjudication.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MemoirResult;
use crate::types::{ExtractedEvent, TimelineEvent};

/// The fields of an event an oracle sees when adjudicating.
///
/// Both candidates and persisted events reduce to this shape, so the
/// oracle never learns about ids, authors, or visibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub title: String,
    pub date: String,
    pub description: String,
    /// Original text excerpt, when the event came from an import.
    pub source_text: Option<String>,
}

impl From<&ExtractedEvent> for EventSummary {
    fn from(candidate: &ExtractedEvent) -> Self {
        Self {
            title: candidate.title.clone(),
            date: candidate.date.clone(),
            description: candidate.description.clone(),
            source_text: candidate.source_text.clone(),
        }
    }
}

impl From<&TimelineEvent> for EventSummary {
    fn from(event: &TimelineEvent) -> Self {
        Self {
            title: event.title.clone(),
            date: event.date.clone(),
            description: event.description.clone(),
            source_text: None,
        }
    }
}

/// Verdict returned by a similarity oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleJudgment {
    /// Whether the two events describe the same occurrence.
    pub is_duplicate: bool,
    /// Confidence 0-100 in the verdict.
    pub confidence: u8,
    /// Short human-readable explanation.
    pub reasoning: String,
}

/// Adjudicates whether two event summaries describe the same occurrence.
///
/// Implementations may call out to an LLM or any other judgment source.
/// Callers treat errors as "no verdict": an oracle failure must never
/// decide a duplicate question on its own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SimilarityOracle: Send + Sync {
    /// Judge whether `candidate` duplicates `existing`.
    async fn judge_similarity(
        &self,
        candidate: &EventSummary,
        existing: &EventSummary,
    ) -> MemoirResult<OracleJudgment>;
}
