//! Timeline types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// What kind of timeline this is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TimelineKind {
    /// A single person's life timeline.
    #[default]
    Personal,
    /// Shared family history.
    Family,
    /// Career and work milestones.
    Work,
    /// Collaboratively edited timeline.
    Shared,
}

/// A named collection of events owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owning user.
    pub owner_id: String,
    /// Timeline kind.
    #[serde(default)]
    pub kind: TimelineKind,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Timeline {
    /// Create a new timeline with a fresh id.
    pub fn new(name: impl Into<String>, owner_id: impl Into<String>, kind: TimelineKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            owner_id: owner_id.into(),
            kind,
            created_at: Utc::now(),
        }
    }

    /// Create a personal timeline.
    pub fn personal(name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self::new(name, owner_id, TimelineKind::Personal)
    }
}
