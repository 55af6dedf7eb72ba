//! Explicit timeline editing state.
//!
//! [`TimelineSession`] owns everything a timeline editor mutates: the
//! event list, accepted connections, active search filters, and a
//! bounded undo history. All edits flow through the session, so every
//! change is recorded and undoable. There are no globals.

pub mod history;

pub use history::{EditHistory, EventAction, DEFAULT_HISTORY_CAPACITY};

use std::cmp::Ordering;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::assist::ConnectionSuggestion;
use crate::error::{MemoirError, MemoirResult};
use crate::types::{
    EventConnection, ExtractedEvent, SearchFilters, Timeline, TimelineEvent, Visibility,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Partial update applied to an existing event. `None` fields are left
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub visibility: Option<Visibility>,
}

/// In-memory editing state for one timeline.
#[derive(Debug, Clone)]
pub struct TimelineSession {
    timeline: Timeline,
    author_id: String,
    events: Vec<TimelineEvent>,
    connections: Vec<EventConnection>,
    filters: SearchFilters,
    history: EditHistory,
}

impl TimelineSession {
    /// Start an empty session for `timeline`, authoring as `author_id`.
    pub fn new(timeline: Timeline, author_id: impl Into<String>) -> Self {
        Self {
            timeline,
            author_id: author_id.into(),
            events: Vec::new(),
            connections: Vec::new(),
            filters: SearchFilters::default(),
            history: EditHistory::new(),
        }
    }

    /// Cap the undo history at `capacity` entries (0 disables undo).
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = EditHistory::with_capacity(capacity);
        self
    }

    /// Seed the session with already-persisted events.
    ///
    /// Loading is not an edit, so the undo history starts empty.
    pub fn with_events(mut self, events: Vec<TimelineEvent>) -> Self {
        self.events = events;
        self.history.clear();
        self
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn connections(&self) -> &[EventConnection] {
        &self.connections
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    /// Mutable access to the active filters.
    pub fn filters_mut(&mut self) -> &mut SearchFilters {
        &mut self.filters
    }

    /// Number of undoable edits currently recorded.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Look up an event by id.
    pub fn event(&self, event_id: &str) -> Option<&TimelineEvent> {
        self.events.iter().find(|e| e.id == event_id)
    }

    /// Create a new event on this timeline.
    pub fn create_event(
        &mut self,
        title: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> &TimelineEvent {
        let event = TimelineEvent::new(title, date, &self.author_id, &self.timeline.id)
            .with_description(description)
            .with_tags(tags);
        self.record_insert(event)
    }

    /// Promote an import candidate to a real event on this timeline.
    pub fn import_candidate(&mut self, candidate: ExtractedEvent) -> &TimelineEvent {
        let event = candidate.promote(&self.author_id, &self.timeline.id);
        self.record_insert(event)
    }

    /// Apply a partial update to an event.
    pub fn update_event(
        &mut self,
        event_id: &str,
        update: EventUpdate,
    ) -> MemoirResult<&TimelineEvent> {
        let index = self
            .index_of(event_id)
            .ok_or_else(|| MemoirError::not_found(event_id))?;
        let before = self.events[index].clone();

        {
            let event = &mut self.events[index];
            if let Some(title) = update.title {
                event.title = title;
            }
            if let Some(date) = update.date {
                event.date = date;
            }
            if let Some(description) = update.description {
                event.description = description;
            }
            if let Some(tags) = update.tags {
                event.tags = tags;
            }
            if let Some(visibility) = update.visibility {
                event.visibility = visibility;
            }
            event.updated_at = Utc::now();
        }

        let after = self.events[index].clone();
        tracing::debug!("Updated event {}", event_id);
        self.history.push(EventAction::Update { before, after });
        Ok(&self.events[index])
    }

    /// Remove an event and any connections that reference it.
    ///
    /// Undoing the delete restores the event but not the dropped
    /// connections.
    pub fn delete_event(&mut self, event_id: &str) -> MemoirResult<TimelineEvent> {
        let index = self
            .index_of(event_id)
            .ok_or_else(|| MemoirError::not_found(event_id))?;
        let event = self.events.remove(index);
        self.connections.retain(|c| !c.involves(event_id));
        tracing::debug!("Deleted event {}", event_id);
        self.history.push(EventAction::Delete {
            event: event.clone(),
        });
        Ok(event)
    }

    /// Undo the most recent edit and return it.
    ///
    /// Returns `Ok(None)` when there is nothing to undo.
    pub fn undo(&mut self) -> MemoirResult<Option<EventAction>> {
        let action = match self.history.pop() {
            Some(action) => action,
            None => return Ok(None),
        };
        self.apply(action.invert())?;
        tracing::debug!("Undid edit of event {}", action.event_id());
        Ok(Some(action))
    }

    /// Manually connect two events.
    pub fn connect_events(
        &mut self,
        event_id_1: &str,
        event_id_2: &str,
    ) -> MemoirResult<&EventConnection> {
        if self.index_of(event_id_1).is_none() {
            return Err(MemoirError::not_found(event_id_1));
        }
        if self.index_of(event_id_2).is_none() {
            return Err(MemoirError::not_found(event_id_2));
        }
        let connection = EventConnection::manual(event_id_1, event_id_2);
        let index = self.connections.len();
        self.connections.push(connection);
        Ok(&self.connections[index])
    }

    /// Accept an assistant connection suggestion for `event_id`.
    pub fn adopt_suggestion(
        &mut self,
        event_id: &str,
        suggestion: &ConnectionSuggestion,
    ) -> MemoirResult<&EventConnection> {
        if self.index_of(event_id).is_none() {
            return Err(MemoirError::not_found(event_id));
        }
        if self.index_of(&suggestion.event_id).is_none() {
            return Err(MemoirError::not_found(suggestion.event_id.clone()));
        }
        let connection = suggestion.accept(event_id);
        let index = self.connections.len();
        self.connections.push(connection);
        Ok(&self.connections[index])
    }

    /// Events matching the active filters, newest first.
    ///
    /// Events whose date is unknown or unparseable sort after all dated
    /// events, in insertion order.
    pub fn filtered_events(&self) -> Vec<&TimelineEvent> {
        let mut matched: Vec<&TimelineEvent> = self
            .events
            .iter()
            .filter(|e| self.filters.matches(e))
            .collect();
        matched.sort_by(|a, b| {
            let da = NaiveDate::parse_from_str(&a.date, DATE_FORMAT).ok();
            let db = NaiveDate::parse_from_str(&b.date, DATE_FORMAT).ok();
            match (da, db) {
                (Some(da), Some(db)) => db.cmp(&da),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
        matched
    }

    fn record_insert(&mut self, event: TimelineEvent) -> &TimelineEvent {
        tracing::debug!("Created event {} ({})", event.id, event.title);
        self.history.push(EventAction::Create {
            event: event.clone(),
        });
        let index = self.events.len();
        self.events.push(event);
        &self.events[index]
    }

    fn apply(&mut self, action: EventAction) -> MemoirResult<()> {
        match action {
            EventAction::Create { event } => self.events.push(event),
            EventAction::Delete { event } => {
                let index = self.index_of(&event.id).ok_or_else(|| {
                    MemoirError::Internal(format!(
                        "undo history references missing event '{}'",
                        event.id
                    ))
                })?;
                self.events.remove(index);
            }
            EventAction::Update { after, .. } => {
                let index = self.index_of(&after.id).ok_or_else(|| {
                    MemoirError::Internal(format!(
                        "undo history references missing event '{}'",
                        after.id
                    ))
                })?;
                self.events[index] = after;
            }
        }
        Ok(())
    }

    fn index_of(&self, event_id: &str) -> Option<usize> {
        self.events.iter().position(|e| e.id == event_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimelineKind;

    fn session() -> TimelineSession {
        let timeline = Timeline::new("My life", "user1", TimelineKind::Personal);
        TimelineSession::new(timeline, "user1")
    }

    #[test]
    fn test_create_event_records_history() {
        let mut session = session();
        let id = session
            .create_event("Wedding day", "2015-08-22", "We got married.", vec![])
            .id
            .clone();

        assert_eq!(session.events().len(), 1);
        assert_eq!(session.history_len(), 1);
        assert_eq!(session.event(&id).unwrap().title, "Wedding day");
        assert_eq!(session.event(&id).unwrap().timeline_id, session.timeline().id);
    }

    #[test]
    fn test_update_event_applies_only_set_fields() {
        let mut session = session();
        let id = session
            .create_event("Weding day", "2015-08-22", "Typo in the title.", vec![])
            .id
            .clone();

        let updated = session
            .update_event(
                &id,
                EventUpdate {
                    title: Some("Wedding day".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "Wedding day");
        assert_eq!(updated.description, "Typo in the title.");
        assert_eq!(updated.date, "2015-08-22");
    }

    #[test]
    fn test_update_unknown_event_is_not_found() {
        let mut session = session();
        let result = session.update_event("missing", EventUpdate::default());
        assert!(matches!(result, Err(MemoirError::NotFound { .. })));
    }

    #[test]
    fn test_delete_event_drops_its_connections() {
        let mut session = session();
        let id1 = session
            .create_event("Road trip", "2021-07-01", "", vec![])
            .id
            .clone();
        let id2 = session
            .create_event("Camping weekend", "2021-07-20", "", vec![])
            .id
            .clone();
        session.connect_events(&id1, &id2).unwrap();
        assert_eq!(session.connections().len(), 1);

        session.delete_event(&id2).unwrap();
        assert!(session.connections().is_empty());
        assert_eq!(session.events().len(), 1);
    }

    #[test]
    fn test_undo_create_removes_event() {
        let mut session = session();
        let id = session
            .create_event("Oops", "2020-01-01", "", vec![])
            .id
            .clone();

        let undone = session.undo().unwrap().unwrap();
        assert_eq!(undone.event_id(), id);
        assert!(session.events().is_empty());
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn test_undo_delete_restores_event() {
        let mut session = session();
        let id = session
            .create_event("Keep me", "2020-01-01", "", vec![])
            .id
            .clone();
        session.delete_event(&id).unwrap();
        assert!(session.events().is_empty());

        session.undo().unwrap();
        assert_eq!(session.events().len(), 1);
        assert_eq!(session.events()[0].id, id);
    }

    #[test]
    fn test_undo_update_restores_previous_fields() {
        let mut session = session();
        let id = session
            .create_event("Original", "2020-01-01", "", vec![])
            .id
            .clone();
        session
            .update_event(
                &id,
                EventUpdate {
                    title: Some("Changed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(session.event(&id).unwrap().title, "Changed");

        session.undo().unwrap();
        assert_eq!(session.event(&id).unwrap().title, "Original");
    }

    #[test]
    fn test_undo_empty_history_is_none() {
        let mut session = session();
        assert!(session.undo().unwrap().is_none());
    }

    #[test]
    fn test_import_candidate_promotes_to_event() {
        let mut session = session();
        let candidate = ExtractedEvent::new("Graduation", "2010-06-15")
            .with_description("Finished school.");

        let id = session.import_candidate(candidate).id.clone();
        let event = session.event(&id).unwrap();
        assert_eq!(event.author_id, "user1");
        assert_eq!(event.timeline_id, session.timeline().id);
        assert_eq!(session.history_len(), 1);
    }

    #[test]
    fn test_filtered_events_sorted_newest_first_with_unknown_last() {
        let mut session = session();
        session.create_event("Old", "2010-01-01", "", vec![]);
        session.create_event("Undated", "unknown", "", vec![]);
        session.create_event("New", "2022-05-05", "", vec![]);

        let titles: Vec<&str> = session
            .filtered_events()
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["New", "Old", "Undated"]);
    }

    #[test]
    fn test_filters_narrow_filtered_events() {
        let mut session = session();
        session.create_event("Wedding day", "2015-08-22", "", vec!["family".to_string()]);
        session.create_event("Job interview", "2016-02-10", "", vec!["work".to_string()]);

        session.filters_mut().query = "wedding".to_string();
        let matched = session.filtered_events();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Wedding day");
    }

    #[test]
    fn test_adopt_suggestion_requires_known_ids() {
        let mut session = session();
        let id = session
            .create_event("Road trip", "2021-07-01", "", vec![])
            .id
            .clone();
        let suggestion = ConnectionSuggestion {
            event_id: "missing".to_string(),
            reason: "Same trip".to_string(),
            confidence: 70.0,
        };

        assert!(session.adopt_suggestion(&id, &suggestion).is_err());
    }

    #[test]
    fn test_adopt_suggestion_adds_unapproved_connection() {
        let mut session = session();
        let id1 = session
            .create_event("Road trip", "2021-07-01", "", vec![])
            .id
            .clone();
        let id2 = session
            .create_event("Camping weekend", "2021-07-20", "", vec![])
            .id
            .clone();
        let suggestion = ConnectionSuggestion {
            event_id: id2.clone(),
            reason: "Same summer".to_string(),
            confidence: 80.0,
        };

        let connection = session.adopt_suggestion(&id1, &suggestion).unwrap();
        assert!(!connection.approved);
        assert_eq!(connection.event_id_2, id2);
        assert_eq!(session.connections().len(), 1);
    }

    #[test]
    fn test_history_capacity_limits_undo_depth() {
        let timeline = Timeline::personal("Short memory", "user1");
        let mut session = TimelineSession::new(timeline, "user1").with_history_capacity(2);

        session.create_event("One", "2020-01-01", "", vec![]);
        session.create_event("Two", "2020-01-02", "", vec![]);
        session.create_event("Three", "2020-01-03", "", vec![]);

        assert_eq!(session.history_len(), 2);
        session.undo().unwrap();
        session.undo().unwrap();
        assert!(session.undo().unwrap().is_none());
        // The oldest create fell off the history, so its event survives.
        assert_eq!(session.events().len(), 1);
        assert_eq!(session.events()[0].title, "One");
    }
}
