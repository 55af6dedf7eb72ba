//! Document import: extraction and deduplication in one pass.
//!
//! The pipeline reads a batch of documents, asks the LLM to extract
//! candidate events from each, and then runs the aggregate through the
//! duplicate pipeline against the caller's existing timeline. One
//! unreadable or unparseable document fails on its own; the rest of the
//! batch continues.

pub mod document;
pub mod extractor;

pub use document::{DocumentKind, ImportedDocument};
pub use extractor::{DocumentExtraction, EventExtractor, DEFAULT_MAX_DOCUMENT_CHARS};

use serde::{Deserialize, Serialize};

use crate::dedup::{DedupEngine, FlaggedDuplicate};
use crate::error::MemoirResult;
use crate::types::{ExtractedEvent, TimelineEvent};

/// Progress notification from the import pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportStage {
    /// Extracting events from one document.
    Extracting {
        /// Document name.
        document: String,
        /// 1-based document index.
        current: usize,
        /// Total documents in the batch.
        total: usize,
    },
    /// Checking one extracted candidate for duplicates.
    Deduplicating {
        /// 1-based candidate index.
        current: usize,
        /// Total candidates extracted across the batch.
        total: usize,
    },
}

/// A document that could not be processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportFailure {
    /// Document name.
    pub document: String,
    /// What went wrong.
    pub message: String,
}

/// Outcome of an import batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    /// Documents processed successfully.
    pub processed: usize,
    /// Documents that failed.
    pub failed: usize,
    /// Candidate events extracted across all processed documents.
    pub events_found: usize,
    /// Candidates that passed deduplication, in extraction order.
    pub unique: Vec<ExtractedEvent>,
    /// Candidates flagged as duplicates of existing events.
    pub duplicates: Vec<FlaggedDuplicate>,
    /// Per-document failures.
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    /// True when at least one document was processed.
    pub fn is_success(&self) -> bool {
        self.processed > 0
    }

    /// One-line summary for the import review screen.
    pub fn describe(&self) -> String {
        format!(
            "found {} events, removed {} duplicates",
            self.events_found,
            self.duplicates.len()
        )
    }
}

/// Extraction plus deduplication over a batch of documents.
pub struct ImportPipeline {
    extractor: EventExtractor,
    dedup: DedupEngine,
}

impl ImportPipeline {
    /// Create a pipeline from its two stages.
    pub fn new(extractor: EventExtractor, dedup: DedupEngine) -> Self {
        Self { extractor, dedup }
    }

    /// Process a batch of documents against an existing timeline.
    ///
    /// `on_stage` fires before each document's extraction and before each
    /// candidate's duplicate check. A failing document is recorded in the
    /// report and the batch continues; the report's `is_success` is true
    /// when at least one document survived.
    pub async fn process_documents(
        &self,
        documents: &[ImportedDocument],
        existing: &[TimelineEvent],
        mut on_stage: impl FnMut(ImportStage),
    ) -> MemoirResult<ImportReport> {
        let total = documents.len();
        let mut all_events = Vec::new();
        let mut failures = Vec::new();
        let mut processed = 0;
        let mut failed = 0;

        for (i, document) in documents.iter().enumerate() {
            on_stage(ImportStage::Extracting {
                document: document.name.clone(),
                current: i + 1,
                total,
            });

            match self.extractor.extract_events(document).await {
                Ok(extraction) => {
                    all_events.extend(extraction.events);
                    processed += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to process '{}': {}", document.name, e);
                    failures.push(ImportFailure {
                        document: document.name.clone(),
                        message: e.to_string(),
                    });
                    failed += 1;
                }
            }
        }

        let events_found = all_events.len();
        let outcome = self
            .dedup
            .deduplicate_with_progress(all_events, existing, |current, total| {
                on_stage(ImportStage::Deduplicating { current, total });
            })
            .await?;

        Ok(ImportReport {
            processed,
            failed,
            events_found,
            unique: outcome.unique,
            duplicates: outcome.duplicates,
            failures,
        })
    }
}
