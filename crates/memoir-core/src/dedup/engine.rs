//! Duplicate detection engine - orchestrates the tiered matching cascade.
//!
//! Executes detection tiers in order of cost, short-circuiting when a
//! tier reaches a verdict:
//! 1. Exact match (string comparison, ~ns)
//! 2. Fuzzy similarity (Levenshtein plus date proximity, ~us)
//! 3. Oracle adjudication (LLM call, ~500ms, borderline scores only)
//!
//! A candidate that no tier flags is unique. Oracle failures downgrade
//! the borderline band to "not a duplicate" instead of failing the
//! batch, so imports keep working when the LLM is unreachable.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::dedup::similarity::weighted_similarity;
use crate::dedup::types::{DedupOutcome, DedupThresholds, DuplicateCheckResult, FlaggedDuplicate};
use crate::error::{MemoirError, MemoirResult};
use crate::traits::{EventSummary, SimilarityOracle};
use crate::types::{ExtractedEvent, TimelineEvent};

/// Tiered duplicate detector for extracted event candidates.
pub struct DedupEngine {
    thresholds: DedupThresholds,
    oracle: Option<Arc<dyn SimilarityOracle>>,
}

impl DedupEngine {
    /// Create an engine with default thresholds.
    pub fn new(oracle: Option<Arc<dyn SimilarityOracle>>) -> Self {
        Self::with_thresholds(DedupThresholds::default(), oracle)
    }

    /// Create an engine with custom thresholds.
    pub fn with_thresholds(
        thresholds: DedupThresholds,
        oracle: Option<Arc<dyn SimilarityOracle>>,
    ) -> Self {
        Self { thresholds, oracle }
    }

    /// Get current thresholds.
    pub fn thresholds(&self) -> &DedupThresholds {
        &self.thresholds
    }

    /// Check if an oracle is attached for borderline adjudication.
    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Check one candidate against a list of existing events.
    ///
    /// Runs the tier cascade and returns a verdict. This never fails:
    /// an oracle error is logged and the borderline candidate passes
    /// through as unique.
    pub async fn check_duplicate(
        &self,
        candidate: &ExtractedEvent,
        existing: &[TimelineEvent],
    ) -> DuplicateCheckResult {
        // Tier 1: exact title and date.
        if let Some(event) = self.find_exact_match(candidate, existing) {
            tracing::debug!("Exact duplicate: '{}' on {}", event.title, event.date);
            return DuplicateCheckResult::exact_match(event.clone());
        }

        // Tier 2: best fuzzy score over all existing events.
        if let Some((event, similarity)) = self.find_best_match(candidate, existing) {
            if similarity >= self.thresholds.auto_flag_threshold {
                tracing::debug!(
                    "Fuzzy duplicate: '{}' vs '{}' (similarity: {:.3})",
                    candidate.title,
                    event.title,
                    similarity
                );
                return DuplicateCheckResult::fuzzy_match(event.clone(), similarity);
            }

            // Tier 3: borderline band goes to the oracle when attached.
            if similarity >= self.thresholds.oracle_floor {
                if let Some(oracle) = &self.oracle {
                    let incoming = EventSummary::from(candidate);
                    let persisted = EventSummary::from(event);
                    match oracle.judge_similarity(&incoming, &persisted).await {
                        Ok(judgment) if judgment.is_duplicate => {
                            tracing::debug!(
                                "Oracle confirmed duplicate: '{}' vs '{}' (confidence: {})",
                                candidate.title,
                                event.title,
                                judgment.confidence
                            );
                            return DuplicateCheckResult::oracle_match(event.clone(), &judgment);
                        }
                        Ok(_) => {
                            tracing::debug!(
                                "Oracle declined duplicate: '{}' vs '{}'",
                                candidate.title,
                                event.title
                            );
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Oracle check failed for '{}', treating as unique: {}",
                                candidate.title,
                                e
                            );
                        }
                    }
                }
            }
        }

        DuplicateCheckResult::not_duplicate()
    }

    /// Partition a batch of candidates into unique and duplicate entries.
    ///
    /// Every candidate is compared against the `existing` list as given;
    /// candidates are not compared against each other, so two copies of a
    /// new event both come back unique.
    pub async fn deduplicate(
        &self,
        candidates: Vec<ExtractedEvent>,
        existing: &[TimelineEvent],
    ) -> MemoirResult<DedupOutcome> {
        self.run_batch(candidates, existing, &mut |_, _| {}, None)
            .await
    }

    /// [`Self::deduplicate`] with a progress callback.
    ///
    /// `on_progress(current, total)` fires once per candidate, before its
    /// check runs, with `current` counting from 1.
    pub async fn deduplicate_with_progress(
        &self,
        candidates: Vec<ExtractedEvent>,
        existing: &[TimelineEvent],
        mut on_progress: impl FnMut(usize, usize),
    ) -> MemoirResult<DedupOutcome> {
        self.run_batch(candidates, existing, &mut on_progress, None)
            .await
    }

    /// [`Self::deduplicate_with_progress`] with cooperative cancellation.
    ///
    /// The token is checked before each candidate; once it fires, the
    /// batch stops with [`MemoirError::Cancelled`] and partial results
    /// are discarded.
    pub async fn deduplicate_cancellable(
        &self,
        candidates: Vec<ExtractedEvent>,
        existing: &[TimelineEvent],
        mut on_progress: impl FnMut(usize, usize),
        cancel: &CancellationToken,
    ) -> MemoirResult<DedupOutcome> {
        self.run_batch(candidates, existing, &mut on_progress, Some(cancel))
            .await
    }

    async fn run_batch(
        &self,
        candidates: Vec<ExtractedEvent>,
        existing: &[TimelineEvent],
        on_progress: &mut dyn FnMut(usize, usize),
        cancel: Option<&CancellationToken>,
    ) -> MemoirResult<DedupOutcome> {
        let total = candidates.len();
        tracing::debug!(
            "Deduplicating {} candidates against {} existing events",
            total,
            existing.len()
        );

        let mut unique = Vec::new();
        let mut duplicates = Vec::new();

        for (i, candidate) in candidates.into_iter().enumerate() {
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    return Err(MemoirError::cancelled());
                }
            }
            on_progress(i + 1, total);

            let result = self.check_duplicate(&candidate, existing).await;
            match (result.is_duplicate, result.matched_event) {
                (true, Some(matched_event)) => duplicates.push(FlaggedDuplicate {
                    candidate,
                    matched_event,
                    reason: result.reason,
                }),
                (true, None) => unreachable!("duplicate verdict without matched event"),
                (false, _) => unique.push(candidate),
            }
        }

        tracing::debug!(
            "Deduplication done: {} unique, {} duplicates",
            unique.len(),
            duplicates.len()
        );
        Ok(DedupOutcome { unique, duplicates })
    }

    fn find_exact_match<'a>(
        &self,
        candidate: &ExtractedEvent,
        existing: &'a [TimelineEvent],
    ) -> Option<&'a TimelineEvent> {
        let title = candidate.title.trim().to_lowercase();
        existing.iter().find(|event| {
            event.title.trim().to_lowercase() == title && event.date == candidate.date
        })
    }

    /// Best-scoring existing event under the configured weights.
    ///
    /// Ties keep the first-encountered event, so verdicts are stable for
    /// a given existing-list order.
    fn find_best_match<'a>(
        &self,
        candidate: &ExtractedEvent,
        existing: &'a [TimelineEvent],
    ) -> Option<(&'a TimelineEvent, f64)> {
        let mut best_match: Option<&TimelineEvent> = None;
        let mut best_similarity = 0.0_f64;

        for event in existing {
            let similarity = weighted_similarity(
                &candidate.title,
                &candidate.date,
                &event.title,
                &event.date,
                self.thresholds.title_weight,
                self.thresholds.date_weight,
            );
            if similarity > best_similarity {
                best_similarity = similarity;
                best_match = Some(event);
            }
        }

        best_match.map(|event| (event, best_similarity))
    }
}
