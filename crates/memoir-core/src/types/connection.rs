//! Connections between related events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// How a connection between two events came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    /// Created by a user.
    Manual,
    /// Proposed by the assistant, pending approval.
    AiSuggested,
    /// Two records of the same real-world event (e.g. on different timelines).
    SameEvent,
}

/// A link between two events on a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventConnection {
    /// Unique identifier.
    pub id: String,
    /// First event.
    pub event_id_1: String,
    /// Second event.
    pub event_id_2: String,
    /// Origin of the connection.
    pub kind: ConnectionKind,
    /// Confidence score 0-100, present for assistant suggestions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f32>,
    /// Whether a user confirmed the connection.
    pub approved: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl EventConnection {
    /// Create a user-made connection (approved immediately).
    pub fn manual(event_id_1: impl Into<String>, event_id_2: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id_1: event_id_1.into(),
            event_id_2: event_id_2.into(),
            kind: ConnectionKind::Manual,
            confidence_score: None,
            approved: true,
            created_at: Utc::now(),
        }
    }

    /// Create an assistant-suggested connection (unapproved until reviewed).
    pub fn suggested(
        event_id_1: impl Into<String>,
        event_id_2: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id_1: event_id_1.into(),
            event_id_2: event_id_2.into(),
            kind: ConnectionKind::AiSuggested,
            confidence_score: Some(confidence),
            approved: false,
            created_at: Utc::now(),
        }
    }

    /// Whether this connection touches the given event.
    pub fn involves(&self, event_id: &str) -> bool {
        self.event_id_1 == event_id || self.event_id_2 == event_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_connection_is_approved() {
        let conn = EventConnection::manual("evt-1", "evt-2");
        assert_eq!(conn.kind, ConnectionKind::Manual);
        assert!(conn.approved);
        assert!(conn.confidence_score.is_none());
    }

    #[test]
    fn test_suggested_connection_needs_approval() {
        let conn = EventConnection::suggested("evt-1", "evt-2", 85.0);
        assert_eq!(conn.kind, ConnectionKind::AiSuggested);
        assert!(!conn.approved);
        assert_eq!(conn.confidence_score, Some(85.0));
    }

    #[test]
    fn test_involves() {
        let conn = EventConnection::manual("evt-1", "evt-2");
        assert!(conn.involves("evt-1"));
        assert!(conn.involves("evt-2"));
        assert!(!conn.involves("evt-3"));
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&ConnectionKind::AiSuggested).unwrap();
        assert_eq!(json, "\"ai_suggested\"");
    }
}
