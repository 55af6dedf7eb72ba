//! LLM-backed event extraction from documents.

use std::sync::Arc;

use crate::error::MemoirResult;
use crate::import::document::ImportedDocument;
use crate::json;
use crate::traits::{GenerationOptions, Llm, ResponseFormat};
use crate::types::{ExtractedEvent, Message};

/// Characters of document text sent to the model before truncation.
pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 15000;

/// Marker appended when a document was cut at the character limit.
const TRUNCATION_MARKER: &str = "\n...[truncated]";

/// Token budget for an extraction reply.
const EXTRACTION_MAX_TOKENS: u32 = 2048;

/// Events and summary extracted from one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentExtraction {
    /// Candidate events found in the document.
    pub events: Vec<ExtractedEvent>,
    /// Brief overview of what the document contains.
    pub summary: String,
}

/// Extracts life-event candidates from document text via an LLM.
pub struct EventExtractor {
    llm: Arc<dyn Llm>,
    max_document_chars: usize,
}

impl EventExtractor {
    /// Create an extractor with the default document size limit.
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self::with_max_document_chars(llm, DEFAULT_MAX_DOCUMENT_CHARS)
    }

    /// Create an extractor with a custom document size limit.
    pub fn with_max_document_chars(llm: Arc<dyn Llm>, max_document_chars: usize) -> Self {
        Self {
            llm,
            max_document_chars,
        }
    }

    /// Extract candidate events from one document.
    ///
    /// Documents longer than the configured limit are cut before the
    /// prompt is built, with a visible truncation marker so the model
    /// knows the text is partial.
    pub async fn extract_events(
        &self,
        document: &ImportedDocument,
    ) -> MemoirResult<DocumentExtraction> {
        tracing::debug!(
            "Extracting events from '{}' ({}, {} chars)",
            document.name,
            document.kind,
            document.content.chars().count()
        );

        let prompt = self.build_prompt(document);
        let messages = vec![Message::user(prompt)];
        let options = GenerationOptions {
            max_tokens: Some(EXTRACTION_MAX_TOKENS),
            response_format: Some(ResponseFormat::Json),
            ..Default::default()
        };

        let response = self.llm.generate(&messages, Some(options)).await?;

        #[derive(serde::Deserialize)]
        struct RawExtraction {
            #[serde(default)]
            events: Vec<ExtractedEvent>,
            #[serde(default)]
            summary: String,
        }

        let raw: RawExtraction = json::parse_json(response.content_or_empty())?;
        tracing::debug!("Extracted {} events from '{}'", raw.events.len(), document.name);

        Ok(DocumentExtraction {
            events: raw.events,
            summary: raw.summary,
        })
    }

    fn build_prompt(&self, document: &ImportedDocument) -> String {
        format!(
            "Analyze this document and extract life events, journal entries, or significant moments.\n\nDOCUMENT: {}\n\nCONTENT:\n{}\n\n{}",
            document.name,
            self.truncate_content(&document.content),
            EXTRACTION_INSTRUCTIONS
        )
    }

    fn truncate_content(&self, content: &str) -> String {
        if content.chars().count() > self.max_document_chars {
            let head: String = content.chars().take(self.max_document_chars).collect();
            format!("{}{}", head, TRUNCATION_MARKER)
        } else {
            content.to_string()
        }
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract each distinct life event, journal entry, or significant moment. For each event:
1. Create a clear, descriptive title
2. Extract or infer the date (YYYY-MM-DD format, or "unknown")
3. Preserve the authentic voice and emotional tone in the description
4. Identify relevant tags (people, places, emotions, themes)
5. Assign confidence score (0-100) based on how clearly this is a life event
6. Include the original text snippet

IMPORTANT:
- Preserve emotional language - don't sanitize or make bland
- Keep personal voice authentic
- Multiple entries in one document should be split out
- Look for date markers ("March 2015", "last summer", "today", etc.)
- Each paragraph/section might be a separate event

Respond in JSON:
{
  "events": [
    {
      "title": "Event title",
      "date": "YYYY-MM-DD or unknown",
      "description": "Full description preserving original voice",
      "tags": ["tag1", "tag2"],
      "confidence": 85,
      "sourceText": "Original text snippet..."
    }
  ],
  "summary": "Brief overview of what this document contains"
}"#;
