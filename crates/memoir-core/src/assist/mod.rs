//! LLM-assisted authoring: suggestions, enhancement, summaries, and
//! connection discovery.
//!
//! Everything here is advisory. The assistant proposes; the user (or the
//! session layer, on the user's behalf) decides what lands on the
//! timeline.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{MemoirError, MemoirResult};
use crate::json;
use crate::traits::{GenerationOptions, Llm, ResponseFormat};
use crate::types::{EventConnection, ExtractedEvent, Message, TimelineEvent, UNKNOWN_DATE};

/// Token budget for assistant replies.
const ASSIST_MAX_TOKENS: u32 = 1024;

/// Most connection suggestions returned for one event.
const MAX_CONNECTION_SUGGESTIONS: usize = 5;

fn default_unknown_date() -> String {
    UNKNOWN_DATE.to_string()
}

/// Structured event proposal built from a voice transcript or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSuggestion {
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_unknown_date")]
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl EventSuggestion {
    /// Convert the suggestion into an import candidate.
    pub fn into_candidate(self) -> ExtractedEvent {
        ExtractedEvent::new(self.title, self.date)
            .with_description(self.description)
            .with_tags(self.tags)
    }
}

/// Proposed rewrite of an existing event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnhancement {
    #[serde(default, alias = "improvedTitle")]
    pub improved_title: String,
    #[serde(default, alias = "improvedDescription")]
    pub improved_description: String,
    #[serde(default, alias = "suggestedTags")]
    pub suggested_tags: Vec<String>,
}

/// Narrative summary of a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineDigest {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub insights: Vec<String>,
}

/// A proposed link between the current event and another one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSuggestion {
    /// Id of the related event.
    #[serde(alias = "eventId")]
    pub event_id: String,
    /// Why the two events are related.
    #[serde(default)]
    pub reason: String,
    /// Confidence 0-100 in the relation.
    #[serde(default)]
    pub confidence: f32,
}

impl ConnectionSuggestion {
    /// Turn the suggestion into an unapproved connection record.
    pub fn accept(&self, current_event_id: impl Into<String>) -> EventConnection {
        EventConnection::suggested(current_event_id, self.event_id.clone(), self.confidence)
    }
}

/// LLM-backed authoring assistant.
pub struct Assistant {
    llm: Arc<dyn Llm>,
}

impl Assistant {
    /// Create an assistant on top of any LLM provider.
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    /// Propose a structured event from a story or memory transcript.
    pub async fn suggest_event(&self, transcript: &str) -> MemoirResult<EventSuggestion> {
        if transcript.trim().is_empty() {
            return Err(MemoirError::validation("Transcript is empty"));
        }

        let prompt = format!(
            "Analyze this story/memory transcript and extract structured event information.\n\nTranscript:\n{}\n\n{}",
            transcript, SUGGEST_EVENT_INSTRUCTIONS
        );
        self.ask(prompt).await
    }

    /// Propose an improved title, description, and tags for an event.
    pub async fn enhance_event(
        &self,
        title: &str,
        description: &str,
    ) -> MemoirResult<EventEnhancement> {
        let prompt = format!(
            "Improve this timeline event:\n\nTitle: {}\nDescription: {}\n\n{}",
            title, description, ENHANCE_EVENT_INSTRUCTIONS
        );
        self.ask(prompt).await
    }

    /// Summarize a timeline into a narrative plus key insights.
    pub async fn summarize_timeline(
        &self,
        events: &[TimelineEvent],
    ) -> MemoirResult<TimelineDigest> {
        if events.is_empty() {
            return Err(MemoirError::validation_with_suggestion(
                "Cannot summarize an empty timeline",
                "Add events before requesting a summary",
            ));
        }

        let events_text = events
            .iter()
            .map(|e| format!("- {}: {} [{}]", e.date, e.title, e.tags.join(", ")))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Analyze this timeline and create a narrative summary:\n\nEvents:\n{}\n\n{}",
            events_text, SUMMARIZE_INSTRUCTIONS
        );
        self.ask(prompt).await
    }

    /// Suggest up to five existing events related to `event`.
    ///
    /// Suggestions naming ids that do not appear in `all_events` (or the
    /// event itself) are dropped, so hallucinated ids never reach the
    /// connection store.
    pub async fn suggest_connections(
        &self,
        event: &TimelineEvent,
        all_events: &[TimelineEvent],
    ) -> MemoirResult<Vec<ConnectionSuggestion>> {
        let others: Vec<&TimelineEvent> =
            all_events.iter().filter(|e| e.id != event.id).collect();
        if others.is_empty() {
            return Ok(Vec::new());
        }

        let others_text = others
            .iter()
            .map(|e| {
                format!(
                    "ID: {}\nTitle: {}\nDate: {}\nTags: {}",
                    e.id,
                    e.title,
                    e.date,
                    e.tags.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = format!(
            "Analyze this event and suggest which other events it's related to:\n\nCURRENT EVENT:\nTitle: {}\nDescription: {}\nDate: {}\nTags: {}\n\nOTHER EVENTS:\n{}\n\n{}",
            event.title,
            event.description,
            event.date,
            event.tags.join(", "),
            others_text,
            SUGGEST_CONNECTIONS_INSTRUCTIONS
        );

        #[derive(Deserialize)]
        struct RawConnections {
            #[serde(default)]
            connections: Vec<ConnectionSuggestion>,
        }

        let raw: RawConnections = self.ask(prompt).await?;
        let suggestions = raw
            .connections
            .into_iter()
            .filter(|s| others.iter().any(|e| e.id == s.event_id))
            .take(MAX_CONNECTION_SUGGESTIONS)
            .collect();
        Ok(suggestions)
    }

    async fn ask<T: serde::de::DeserializeOwned>(&self, prompt: String) -> MemoirResult<T> {
        let messages = vec![Message::user(prompt)];
        let options = GenerationOptions {
            max_tokens: Some(ASSIST_MAX_TOKENS),
            response_format: Some(ResponseFormat::Json),
            ..Default::default()
        };
        let response = self.llm.generate(&messages, Some(options)).await?;
        json::parse_json(response.content_or_empty())
    }
}

const SUGGEST_EVENT_INSTRUCTIONS: &str = r#"Please provide:
1. A concise event title (3-10 words)
2. A well-formatted description (2-4 sentences, preserve key details)
3. Inferred date if mentioned (YYYY-MM-DD format, or "unknown")
4. Relevant tags (3-5 tags: people, places, activities, emotions)

Respond in JSON format:
{
  "title": "Event title here",
  "description": "Description here",
  "date": "YYYY-MM-DD or unknown",
  "tags": ["tag1", "tag2", "tag3"]
}"#;

const ENHANCE_EVENT_INSTRUCTIONS: &str = r#"Please:
1. Suggest a more engaging title (if improvement possible)
2. Enhance the description (add context, improve flow, preserve facts)
3. Suggest relevant tags (people, places, themes, emotions)

Respond in JSON:
{
  "improvedTitle": "Better title or original if good",
  "improvedDescription": "Enhanced description",
  "suggestedTags": ["tag1", "tag2", "tag3"]
}"#;

const SUMMARIZE_INSTRUCTIONS: &str = r#"Provide:
1. A cohesive narrative summary (3-5 sentences)
2. Key insights/patterns (3-5 bullet points)

Respond in JSON:
{
  "summary": "Narrative summary here",
  "insights": ["insight 1", "insight 2", "insight 3"]
}"#;

const SUGGEST_CONNECTIONS_INSTRUCTIONS: &str = r#"Find up to 5 related events based on:
- Shared themes, people, or locations
- Temporal proximity
- Cause-and-effect relationships
- Similar tags or topics

Respond in JSON with confidence scores (0-100):
{
  "connections": [
    {
      "eventId": "event-id-here",
      "reason": "Brief explanation of connection",
      "confidence": 85
    }
  ]
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::LlmResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedLlm {
        response: String,
        last_prompt: Mutex<Option<String>>,
    }

    impl CannedLlm {
        fn new(response: impl Into<String>) -> Self {
            Self {
                response: response.into(),
                last_prompt: Mutex::new(None),
            }
        }

        fn last_prompt(&self) -> String {
            self.last_prompt.lock().unwrap().clone().unwrap_or_default()
        }
    }

    #[async_trait]
    impl Llm for CannedLlm {
        async fn generate(
            &self,
            messages: &[Message],
            _options: Option<GenerationOptions>,
        ) -> MemoirResult<LlmResponse> {
            *self.last_prompt.lock().unwrap() = messages.first().map(|m| m.content.clone());
            Ok(LlmResponse {
                content: Some(self.response.clone()),
                usage: None,
            })
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    fn event(id: &str, title: &str, date: &str, tags: &[&str]) -> TimelineEvent {
        TimelineEvent::new(title, date, "user1", "tl1")
            .with_id(id)
            .with_tags(tags.iter().map(|t| t.to_string()).collect())
    }

    #[tokio::test]
    async fn test_suggest_event_from_transcript() {
        let llm = Arc::new(CannedLlm::new(
            r#"{"title": "First day at the bakery", "description": "Started the new job.", "date": "2022-03-01", "tags": ["work", "beginnings"]}"#,
        ));
        let assistant = Assistant::new(llm.clone());

        let suggestion = assistant
            .suggest_event("So in March 2022 I finally started at the bakery...")
            .await
            .unwrap();
        assert_eq!(suggestion.title, "First day at the bakery");
        assert_eq!(suggestion.date, "2022-03-01");
        assert_eq!(suggestion.tags.len(), 2);
        assert!(llm.last_prompt().contains("Transcript:"));
    }

    #[tokio::test]
    async fn test_suggest_event_missing_date_defaults_to_unknown() {
        let assistant = Assistant::new(Arc::new(CannedLlm::new(
            r#"{"title": "Beach week", "description": "A week by the sea."}"#,
        )));

        let suggestion = assistant.suggest_event("We spent a week...").await.unwrap();
        assert_eq!(suggestion.date, UNKNOWN_DATE);

        let candidate = suggestion.into_candidate();
        assert_eq!(candidate.title, "Beach week");
        assert_eq!(candidate.date, UNKNOWN_DATE);
    }

    #[tokio::test]
    async fn test_suggest_event_rejects_empty_transcript() {
        let assistant = Assistant::new(Arc::new(CannedLlm::new("{}")));
        assert!(assistant.suggest_event("   ").await.is_err());
    }

    #[tokio::test]
    async fn test_enhance_event_accepts_camel_case() {
        let assistant = Assistant::new(Arc::new(CannedLlm::new(
            r#"{"improvedTitle": "The Big Move West", "improvedDescription": "Better.", "suggestedTags": ["moving"]}"#,
        )));

        let enhancement = assistant
            .enhance_event("Moved", "We moved.")
            .await
            .unwrap();
        assert_eq!(enhancement.improved_title, "The Big Move West");
        assert_eq!(enhancement.suggested_tags, vec!["moving".to_string()]);
    }

    #[tokio::test]
    async fn test_summarize_timeline_formats_event_lines() {
        let llm = Arc::new(CannedLlm::new(
            r#"{"summary": "A year of change.", "insights": ["Moved twice"]}"#,
        ));
        let assistant = Assistant::new(llm.clone());
        let events = vec![event("e1", "Wedding day", "2015-08-22", &["family", "wedding"])];

        let digest = assistant.summarize_timeline(&events).await.unwrap();
        assert_eq!(digest.summary, "A year of change.");
        assert_eq!(digest.insights.len(), 1);
        assert!(llm
            .last_prompt()
            .contains("- 2015-08-22: Wedding day [family, wedding]"));
    }

    #[tokio::test]
    async fn test_summarize_empty_timeline_is_error() {
        let assistant = Assistant::new(Arc::new(CannedLlm::new("{}")));
        assert!(assistant.summarize_timeline(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_suggest_connections_filters_unknown_ids() {
        let llm = Arc::new(CannedLlm::new(
            r#"{"connections": [
                {"eventId": "e2", "reason": "Same summer", "confidence": 80},
                {"eventId": "made-up", "reason": "Hallucinated", "confidence": 90},
                {"eventId": "e1", "reason": "Itself", "confidence": 99}
            ]}"#,
        ));
        let assistant = Assistant::new(llm.clone());
        let current = event("e1", "Road trip", "2021-07-01", &["travel"]);
        let all = vec![
            current.clone(),
            event("e2", "Camping weekend", "2021-07-20", &["travel"]),
        ];

        let suggestions = assistant.suggest_connections(&current, &all).await.unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].event_id, "e2");
        // The prompt lists candidates but never the current event's id block.
        assert!(llm.last_prompt().contains("ID: e2"));
        assert!(!llm.last_prompt().contains("ID: e1"));
    }

    #[tokio::test]
    async fn test_suggest_connections_with_no_other_events_skips_llm() {
        let llm = Arc::new(CannedLlm::new("should never be used"));
        let assistant = Assistant::new(llm.clone());
        let current = event("e1", "Road trip", "2021-07-01", &[]);

        let suggestions = assistant
            .suggest_connections(&current, std::slice::from_ref(&current))
            .await
            .unwrap();
        assert!(suggestions.is_empty());
        assert!(llm.last_prompt().is_empty());
    }

    #[test]
    fn test_accept_builds_unapproved_connection() {
        let suggestion = ConnectionSuggestion {
            event_id: "e2".to_string(),
            reason: "Same trip".to_string(),
            confidence: 80.0,
        };
        let connection = suggestion.accept("e1");
        assert_eq!(connection.event_id_1, "e1");
        assert_eq!(connection.event_id_2, "e2");
        assert!(!connection.approved);
        assert_eq!(connection.confidence_score, Some(80.0));
    }
}
