//! Bounded undo history for event edits.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::TimelineEvent;

/// Default number of edits kept for undo.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// One recorded mutation of the event list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventAction {
    /// An event was added.
    Create { event: TimelineEvent },
    /// An event was modified in place.
    Update {
        before: TimelineEvent,
        after: TimelineEvent,
    },
    /// An event was removed.
    Delete { event: TimelineEvent },
}

impl EventAction {
    /// The action that reverses this one.
    pub fn invert(&self) -> EventAction {
        match self {
            EventAction::Create { event } => EventAction::Delete {
                event: event.clone(),
            },
            EventAction::Update { before, after } => EventAction::Update {
                before: after.clone(),
                after: before.clone(),
            },
            EventAction::Delete { event } => EventAction::Create {
                event: event.clone(),
            },
        }
    }

    /// Id of the event this action touched.
    pub fn event_id(&self) -> &str {
        match self {
            EventAction::Create { event } => &event.id,
            EventAction::Update { after, .. } => &after.id,
            EventAction::Delete { event } => &event.id,
        }
    }
}

/// LIFO edit log with a fixed capacity.
///
/// When full, recording a new action evicts the oldest one, so undo always
/// reaches the most recent edits. A capacity of zero disables recording
/// entirely.
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    actions: VecDeque<EventAction>,
    capacity: usize,
}

impl EditHistory {
    /// Create a history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a history holding at most `capacity` actions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            actions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record an action, evicting the oldest if at capacity.
    pub fn push(&mut self, action: EventAction) {
        if self.capacity == 0 {
            return;
        }
        if self.actions.len() == self.capacity {
            self.actions.pop_front();
        }
        self.actions.push_back(action);
    }

    /// Remove and return the most recent action.
    pub fn pop(&mut self) -> Option<EventAction> {
        self.actions.pop_back()
    }

    /// Number of recorded actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no actions are recorded.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Maximum number of actions retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all recorded actions.
    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, title: &str) -> TimelineEvent {
        TimelineEvent::new(title, "2020-01-01", "user1", "tl1").with_id(id)
    }

    #[test]
    fn test_pop_returns_most_recent_first() {
        let mut history = EditHistory::new();
        history.push(EventAction::Create {
            event: event("e1", "First"),
        });
        history.push(EventAction::Create {
            event: event("e2", "Second"),
        });

        assert_eq!(history.pop().unwrap().event_id(), "e2");
        assert_eq!(history.pop().unwrap().event_id(), "e1");
        assert!(history.pop().is_none());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = EditHistory::with_capacity(2);
        for i in 0..3 {
            history.push(EventAction::Create {
                event: event(&format!("e{i}"), "Event"),
            });
        }

        assert_eq!(history.len(), 2);
        assert_eq!(history.pop().unwrap().event_id(), "e2");
        assert_eq!(history.pop().unwrap().event_id(), "e1");
    }

    #[test]
    fn test_zero_capacity_disables_recording() {
        let mut history = EditHistory::with_capacity(0);
        history.push(EventAction::Create {
            event: event("e1", "First"),
        });
        assert!(history.is_empty());
    }

    #[test]
    fn test_invert_round_trips() {
        let before = event("e1", "Old title");
        let after = event("e1", "New title");

        let update = EventAction::Update {
            before: before.clone(),
            after: after.clone(),
        };
        let inverted = update.invert();
        assert_eq!(
            inverted,
            EventAction::Update {
                before: after,
                after: before
            }
        );
        assert_eq!(inverted.invert(), update);

        let made = event("e2", "Made");
        let create = EventAction::Create {
            event: made.clone(),
        };
        assert_eq!(create.invert(), EventAction::Delete { event: made });
    }
}
