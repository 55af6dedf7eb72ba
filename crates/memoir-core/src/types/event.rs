//! Timeline event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Sentinel date value for events whose date could not be determined.
///
/// Extraction emits this when a document or transcript mentions an event
/// without a usable date marker. The similarity scorer treats it as
/// neutral evidence.
pub const UNKNOWN_DATE: &str = "unknown";

/// Who can see an event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Only the author.
    #[default]
    Private,
    /// The author's friends.
    Friends,
    /// The author's family circle.
    Family,
    /// Anyone with access to the timeline.
    Public,
}

/// A persisted life event on a timeline.
///
/// `date` is an ISO calendar date string (`YYYY-MM-DD`) or the
/// [`UNKNOWN_DATE`] sentinel; it is kept as a string because imported
/// events routinely arrive with unparseable or unknown dates and the
/// system must carry them through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Unique identifier.
    pub id: String,
    /// Event title.
    pub title: String,
    /// ISO calendar date, or [`UNKNOWN_DATE`].
    pub date: String,
    /// Free-text description (may be empty).
    #[serde(default)]
    pub description: String,
    /// Tags: people, places, themes, emotions.
    #[serde(default)]
    pub tags: Vec<String>,
    /// User who authored the event.
    pub author_id: String,
    /// Timeline this event belongs to.
    pub timeline_id: String,
    /// Users tagged in this event.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<String>,
    /// Sharing scope.
    #[serde(default)]
    pub visibility: Visibility,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TimelineEvent {
    /// Create a new event with a fresh id and current timestamps.
    pub fn new(
        title: impl Into<String>,
        date: impl Into<String>,
        author_id: impl Into<String>,
        timeline_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            date: date.into(),
            description: String::new(),
            tags: Vec::new(),
            author_id: author_id.into(),
            timeline_id: timeline_id.into(),
            mentions: Vec::new(),
            visibility: Visibility::default(),
            created_at: now,
            updated_at: now,
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

    /// Set the visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the mentioned users.
    pub fn with_mentions(mut self, mentions: Vec<String>) -> Self {
        self.mentions = mentions;
        self
    }

    /// Override the generated id (useful when loading persisted events).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Whether the event's date is the unknown sentinel.
    pub fn has_unknown_date(&self) -> bool {
        self.date == UNKNOWN_DATE
    }
}
