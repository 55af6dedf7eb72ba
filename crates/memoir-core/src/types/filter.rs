//! Timeline search filters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::event::TimelineEvent;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Combined search criteria for a timeline view.
///
/// All populated criteria must match for an event to pass. An empty
/// filter matches every event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Free-text query matched against title, description, and tags.
    #[serde(default)]
    pub query: String,
    /// Inclusive lower date bound (ISO calendar date).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    /// Inclusive upper date bound (ISO calendar date).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    /// Selected tags. An event passes when it carries any of them.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Restrict to a single timeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline_id: Option<String>,
}

impl SearchFilters {
    /// Filter matching every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.tags.is_empty()
            && self.timeline_id.is_none()
    }

    /// Reset to the match-all filter.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether `event` passes every populated criterion.
    ///
    /// Date bounds only apply to events whose date parses as an ISO
    /// calendar date; events with an unknown or malformed date are kept
    /// so they stay reachable while dated filters are active.
    pub fn matches(&self, event: &TimelineEvent) -> bool {
        if let Some(timeline_id) = &self.timeline_id {
            if &event.timeline_id != timeline_id {
                return false;
            }
        }

        if !self.query.is_empty() {
            let needle = self.query.to_lowercase();
            let in_title = event.title.to_lowercase().contains(&needle);
            let in_description = event.description.to_lowercase().contains(&needle);
            let in_tags = event
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle));
            if !in_title && !in_description && !in_tags {
                return false;
            }
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            if let Ok(event_date) = NaiveDate::parse_from_str(&event.date, DATE_FORMAT) {
                if let Some(from) = self
                    .date_from
                    .as_deref()
                    .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
                {
                    if event_date < from {
                        return false;
                    }
                }
                if let Some(to) = self
                    .date_to
                    .as_deref()
                    .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
                {
                    if event_date > to {
                        return false;
                    }
                }
            }
        }

        if !self.tags.is_empty() {
            let has_any = self.tags.iter().any(|tag| event.tags.contains(tag));
            if !has_any {
                return false;
            }
        }

        true
    }
}
