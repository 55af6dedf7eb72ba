//! Core types for duplicate detection.
//!
//! The duplicate pipeline decides whether an extracted candidate already
//! exists on a timeline. Results carry which tier decided, the matched
//! event, and a human-readable reason shown in the import review.

use serde::{Deserialize, Serialize};

use crate::dedup::similarity::{DATE_WEIGHT, TITLE_WEIGHT};
use crate::error::{MemoirError, MemoirResult};
use crate::traits::OracleJudgment;
use crate::types::{ExtractedEvent, TimelineEvent};

/// Which detection tier decided a duplicate question.
///
/// Tiers are ordered by cost, from cheapest to most expensive:
/// 1. Exact (string comparison)
/// 2. Fuzzy (Levenshtein plus date proximity)
/// 3. Oracle (LLM adjudication, only for borderline scores)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionTier {
    /// Identical title (case-insensitive, trimmed) and identical date string.
    Exact,
    /// Combined similarity at or above the auto-flag threshold.
    Fuzzy,
    /// Borderline score confirmed by the similarity oracle.
    Oracle,
    /// No tier flagged a duplicate.
    None,
}

/// Configurable thresholds for the duplicate pipeline.
///
/// Scores at or above `auto_flag_threshold` are flagged without oracle
/// involvement. The band between `oracle_floor` and `auto_flag_threshold`
/// is too ambiguous for string metrics alone and goes to the oracle when
/// one is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupThresholds {
    /// At or above this combined score: flag as duplicate (default: 0.85).
    #[serde(default = "default_auto_flag_threshold")]
    pub auto_flag_threshold: f64,
    /// At or above this (but below auto-flag): consult the oracle (default: 0.60).
    #[serde(default = "default_oracle_floor")]
    pub oracle_floor: f64,
    /// Weight of title similarity in the combined score (default: 0.7).
    #[serde(default = "default_title_weight")]
    pub title_weight: f64,
    /// Weight of date proximity in the combined score (default: 0.3).
    #[serde(default = "default_date_weight")]
    pub date_weight: f64,
}

fn default_auto_flag_threshold() -> f64 {
    0.85
}

fn default_oracle_floor() -> f64 {
    0.60
}

fn default_title_weight() -> f64 {
    TITLE_WEIGHT
}

fn default_date_weight() -> f64 {
    DATE_WEIGHT
}

impl Default for DedupThresholds {
    fn default() -> Self {
        Self {
            auto_flag_threshold: default_auto_flag_threshold(),
            oracle_floor: default_oracle_floor(),
            title_weight: default_title_weight(),
            date_weight: default_date_weight(),
        }
    }
}

impl DedupThresholds {
    /// Validate threshold and weight ranges.
    pub fn validate(&self) -> MemoirResult<()> {
        if !(0.0..=1.0).contains(&self.auto_flag_threshold) {
            return Err(MemoirError::validation(format!(
                "auto_flag_threshold must be in [0.0, 1.0], got {}",
                self.auto_flag_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.oracle_floor) {
            return Err(MemoirError::validation(format!(
                "oracle_floor must be in [0.0, 1.0], got {}",
                self.oracle_floor
            )));
        }
        if self.oracle_floor > self.auto_flag_threshold {
            return Err(MemoirError::validation_with_suggestion(
                format!(
                    "oracle_floor ({}) exceeds auto_flag_threshold ({})",
                    self.oracle_floor, self.auto_flag_threshold
                ),
                "Lower oracle_floor or raise auto_flag_threshold",
            ));
        }
        if self.title_weight < 0.0 || self.date_weight < 0.0 {
            return Err(MemoirError::validation(
                "similarity weights must be non-negative",
            ));
        }
        if (self.title_weight + self.date_weight - 1.0).abs() > 1e-6 {
            return Err(MemoirError::validation_with_suggestion(
                format!(
                    "similarity weights must sum to 1.0, got {}",
                    self.title_weight + self.date_weight
                ),
                "Adjust title_weight and date_weight so they sum to 1.0",
            ));
        }
        Ok(())
    }
}

/// Verdict for a single candidate against a list of existing events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCheckResult {
    /// Whether the candidate was flagged as a duplicate.
    pub is_duplicate: bool,
    /// Confidence 0-100 in the verdict. Zero when not a duplicate.
    pub confidence: u8,
    /// The existing event the candidate duplicates. Present exactly when
    /// `is_duplicate` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_event: Option<TimelineEvent>,
    /// Human-readable explanation for the import review.
    pub reason: String,
    /// Which tier decided.
    pub tier: DetectionTier,
}

impl DuplicateCheckResult {
    /// Verdict for an exact title-and-date match.
    pub fn exact_match(event: TimelineEvent) -> Self {
        Self {
            is_duplicate: true,
            confidence: 100,
            matched_event: Some(event),
            reason: "Exact match: same title and date".to_string(),
            tier: DetectionTier::Exact,
        }
    }

    /// Verdict for a fuzzy match at or above the auto-flag threshold.
    pub fn fuzzy_match(event: TimelineEvent, similarity: f64) -> Self {
        let confidence = (similarity * 100.0).round() as u8;
        Self {
            is_duplicate: true,
            confidence,
            matched_event: Some(event),
            reason: format!("Similar title and close date ({}% match)", confidence),
            tier: DetectionTier::Fuzzy,
        }
    }

    /// Verdict for a borderline match the oracle confirmed.
    pub fn oracle_match(event: TimelineEvent, judgment: &OracleJudgment) -> Self {
        let reasoning = if judgment.reasoning.is_empty() {
            "Duplicate detected"
        } else {
            judgment.reasoning.as_str()
        };
        Self {
            is_duplicate: true,
            confidence: judgment.confidence,
            matched_event: Some(event),
            reason: format!("AI analysis: {}", reasoning),
            tier: DetectionTier::Oracle,
        }
    }

    /// Verdict when no tier flagged the candidate.
    pub fn not_duplicate() -> Self {
        Self {
            is_duplicate: false,
            confidence: 0,
            matched_event: None,
            reason: "No duplicate found".to_string(),
            tier: DetectionTier::None,
        }
    }
}

/// A candidate flagged as duplicating an existing event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedDuplicate {
    /// The incoming candidate.
    pub candidate: ExtractedEvent,
    /// The existing event it duplicates.
    pub matched_event: TimelineEvent,
    /// Why it was flagged.
    pub reason: String,
}

/// Partition of a candidate batch into unique and duplicate entries.
///
/// Both lists preserve the candidates' input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DedupOutcome {
    /// Candidates safe to add to the timeline.
    pub unique: Vec<ExtractedEvent>,
    /// Candidates flagged for review.
    pub duplicates: Vec<FlaggedDuplicate>,
}

impl DedupOutcome {
    /// Total candidates processed.
    pub fn total(&self) -> usize {
        self.unique.len() + self.duplicates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let thresholds = DedupThresholds::default();
        assert!((thresholds.auto_flag_threshold - 0.85).abs() < f64::EPSILON);
        assert!((thresholds.oracle_floor - 0.60).abs() < f64::EPSILON);
        assert!((thresholds.title_weight - 0.7).abs() < f64::EPSILON);
        assert!((thresholds.date_weight - 0.3).abs() < f64::EPSILON);
        thresholds.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_inverted_band() {
        let thresholds = DedupThresholds {
            auto_flag_threshold: 0.5,
            oracle_floor: 0.9,
            ..Default::default()
        };
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unbalanced_weights() {
        let thresholds = DedupThresholds {
            title_weight: 0.8,
            date_weight: 0.4,
            ..Default::default()
        };
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn test_thresholds_deserialize_with_partial_fields() {
        let thresholds: DedupThresholds =
            serde_json::from_str(r#"{"auto_flag_threshold": 0.9}"#).unwrap();
        assert!((thresholds.auto_flag_threshold - 0.9).abs() < f64::EPSILON);
        assert!((thresholds.oracle_floor - 0.60).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fuzzy_match_rounds_confidence() {
        let event = TimelineEvent::new("Trip to Paris", "2019-06-10", "user1", "tl1");
        let result = DuplicateCheckResult::fuzzy_match(event, 0.946);
        assert_eq!(result.confidence, 95);
        assert!(result.reason.contains("95% match"));
        assert_eq!(result.tier, DetectionTier::Fuzzy);
    }

    #[test]
    fn test_oracle_match_reason_fallback() {
        let event = TimelineEvent::new("Graduation", "2010-06-12", "user1", "tl1");
        let judgment = OracleJudgment {
            is_duplicate: true,
            confidence: 80,
            reasoning: String::new(),
        };
        let result = DuplicateCheckResult::oracle_match(event, &judgment);
        assert_eq!(result.reason, "AI analysis: Duplicate detected");
        assert_eq!(result.confidence, 80);
    }

    #[test]
    fn test_not_duplicate_shape() {
        let result = DuplicateCheckResult::not_duplicate();
        assert!(!result.is_duplicate);
        assert_eq!(result.confidence, 0);
        assert!(result.matched_event.is_none());
        assert_eq!(result.tier, DetectionTier::None);
    }
}
