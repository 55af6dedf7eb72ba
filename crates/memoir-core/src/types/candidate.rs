//! Extracted event candidates awaiting import.

use serde::{Deserialize, Serialize};

use super::event::{TimelineEvent, UNKNOWN_DATE};

fn default_unknown_date() -> String {
    UNKNOWN_DATE.to_string()
}

/// An event extracted from a document, photo batch, or voice transcript.
///
/// Candidates have no identity of their own: they are either discarded as
/// duplicates or promoted into a persisted [`TimelineEvent`]. The serde
/// aliases accept the camelCase field names the extraction prompts ask
/// the model to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEvent {
    /// Proposed title.
    pub title: String,
    /// ISO calendar date, or [`UNKNOWN_DATE`] when no date marker was found.
    #[serde(default = "default_unknown_date")]
    pub date: String,
    /// Proposed description (may be empty).
    #[serde(default)]
    pub description: String,
    /// Proposed tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Extractor's confidence 0-100 that this is a real life event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Original text excerpt the event was extracted from, for audit.
    #[serde(default, alias = "sourceText", skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
}

impl ExtractedEvent {
    /// Create a bare candidate.
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            description: String::new(),
            tags: Vec::new(),
            confidence: None,
            source_text: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the source excerpt.
    pub fn with_source_text(mut self, source_text: impl Into<String>) -> Self {
        self.source_text = Some(source_text.into());
        self
    }

    /// Set the extractor confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Promote the candidate into a persisted event.
    ///
    /// The candidate's source excerpt and confidence are audit data for
    /// the import review and are not carried onto the event.
    pub fn promote(
        self,
        author_id: impl Into<String>,
        timeline_id: impl Into<String>,
    ) -> TimelineEvent {
        TimelineEvent::new(self.title, self.date, author_id, timeline_id)
            .with_description(self.description)
            .with_tags(self.tags)
    }
}
