//! LLM-backed similarity oracle for borderline duplicate candidates.
//!
//! This is the slowest tier (~500ms per call) and only runs for scores
//! the fuzzy tier could not settle. Calls are bounded by a timeout, and
//! every failure surfaces as an oracle error the engine can downgrade
//! to a "not duplicate" verdict.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{MemoirError, MemoirResult};
use crate::json;
use crate::traits::{
    EventSummary, GenerationOptions, Llm, OracleJudgment, ResponseFormat, SimilarityOracle,
};
use crate::types::Message;

/// Upper bound on a single oracle call.
pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Sampling temperature for adjudication. Low, so verdicts are stable.
const ADJUDICATION_TEMPERATURE: f32 = 0.1;

/// Token budget for a verdict. The reply is one small JSON object.
const ADJUDICATION_MAX_TOKENS: u32 = 200;

/// Characters of source excerpt shown to the model.
const SOURCE_EXCERPT_CHARS: usize = 200;

/// Similarity oracle that asks an LLM whether two events are the same.
pub struct LlmAdjudicator {
    llm: Arc<dyn Llm>,
    timeout: Duration,
}

impl LlmAdjudicator {
    /// Create an adjudicator with the default timeout.
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self::with_timeout(llm, DEFAULT_ORACLE_TIMEOUT)
    }

    /// Create an adjudicator with a custom timeout.
    pub fn with_timeout(llm: Arc<dyn Llm>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    fn build_prompt(&self, candidate: &EventSummary, existing: &EventSummary) -> String {
        let mut prompt = format!(
            "{}\n\nEvent A (New):\n{}\n\nEvent B (Existing):\n{}",
            ADJUDICATION_PREAMBLE,
            self.describe_event(candidate),
            self.describe_event(existing)
        );
        prompt.push_str("\n\n");
        prompt.push_str(ADJUDICATION_FOOTER);
        prompt
    }

    fn describe_event(&self, summary: &EventSummary) -> String {
        let description = if summary.description.is_empty() {
            "(no description)"
        } else {
            summary.description.as_str()
        };
        let mut block = format!(
            "- Title: {}\n- Date: {}\n- Description: {}",
            summary.title, summary.date, description
        );
        if let Some(source) = &summary.source_text {
            let excerpt: String = source.chars().take(SOURCE_EXCERPT_CHARS).collect();
            block.push_str(&format!("\n- Source excerpt: {}...", excerpt));
        }
        block
    }

    fn parse_judgment(&self, response: &str) -> MemoirResult<OracleJudgment> {
        #[derive(serde::Deserialize)]
        struct RawJudgment {
            #[serde(rename = "isDuplicate", alias = "is_duplicate")]
            is_duplicate: bool,
            confidence: f64,
            #[serde(default)]
            reasoning: String,
        }

        let raw: RawJudgment =
            json::parse_json(response).map_err(|e| MemoirError::oracle_malformed(e.to_string()))?;

        Ok(OracleJudgment {
            is_duplicate: raw.is_duplicate,
            confidence: raw.confidence.clamp(0.0, 100.0).round() as u8,
            reasoning: raw.reasoning,
        })
    }
}

#[async_trait]
impl SimilarityOracle for LlmAdjudicator {
    async fn judge_similarity(
        &self,
        candidate: &EventSummary,
        existing: &EventSummary,
    ) -> MemoirResult<OracleJudgment> {
        let prompt = self.build_prompt(candidate, existing);
        let messages = vec![Message::user(prompt)];
        let options = GenerationOptions {
            temperature: Some(ADJUDICATION_TEMPERATURE),
            max_tokens: Some(ADJUDICATION_MAX_TOKENS),
            response_format: Some(ResponseFormat::Json),
        };

        let call = self.llm.generate(&messages, Some(options));
        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| MemoirError::oracle_timeout(self.timeout))?
            .map_err(|e| MemoirError::oracle_unavailable(e.to_string()))?;

        self.parse_judgment(response.content_or_empty())
    }
}

const ADJUDICATION_PREAMBLE: &str = "You are helping deduplicate a personal timeline. Compare these two life events and determine if they describe the SAME event.";

const ADJUDICATION_FOOTER: &str = r#"Consider: same date but different titles could still be the same event described differently. Similar titles with close dates are likely duplicates.

Respond with ONLY a JSON object:
{"isDuplicate": true/false, "confidence": 0-100, "reasoning": "brief explanation"}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::traits::LlmResponse;
    use std::sync::Mutex;

    struct CannedLlm {
        response: String,
    }

    impl CannedLlm {
        fn new(response: impl Into<String>) -> Self {
            Self {
                response: response.into(),
            }
        }
    }

    #[async_trait]
    impl Llm for CannedLlm {
        async fn generate(
            &self,
            _messages: &[Message],
            _options: Option<GenerationOptions>,
        ) -> MemoirResult<LlmResponse> {
            Ok(LlmResponse {
                content: Some(self.response.clone()),
                usage: None,
            })
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl Llm for FailingLlm {
        async fn generate(
            &self,
            _messages: &[Message],
            _options: Option<GenerationOptions>,
        ) -> MemoirResult<LlmResponse> {
            Err(MemoirError::llm("connection refused"))
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    struct SlowLlm;

    #[async_trait]
    impl Llm for SlowLlm {
        async fn generate(
            &self,
            _messages: &[Message],
            _options: Option<GenerationOptions>,
        ) -> MemoirResult<LlmResponse> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(LlmResponse::default())
        }

        fn model_name(&self) -> &str {
            "slow"
        }
    }

    struct CapturingLlm {
        captured: Mutex<Option<(Vec<Message>, Option<GenerationOptions>)>>,
    }

    #[async_trait]
    impl Llm for CapturingLlm {
        async fn generate(
            &self,
            messages: &[Message],
            options: Option<GenerationOptions>,
        ) -> MemoirResult<LlmResponse> {
            *self.captured.lock().unwrap() = Some((messages.to_vec(), options));
            Ok(LlmResponse {
                content: Some(
                    r#"{"isDuplicate": false, "confidence": 50, "reasoning": ""}"#.to_string(),
                ),
                usage: None,
            })
        }

        fn model_name(&self) -> &str {
            "capturing"
        }
    }

    fn summary(title: &str, date: &str) -> EventSummary {
        EventSummary {
            title: title.to_string(),
            date: date.to_string(),
            description: String::new(),
            source_text: None,
        }
    }

    #[test]
    fn test_build_prompt_layout() {
        let adjudicator = LlmAdjudicator::new(Arc::new(CannedLlm::new("")));
        let candidate = summary("Graduation day", "2010-06-12");
        let existing = summary("Graduation trip", "2010-06-12");

        let prompt = adjudicator.build_prompt(&candidate, &existing);
        assert!(prompt.contains("Event A (New):"));
        assert!(prompt.contains("Event B (Existing):"));
        assert!(prompt.contains("- Title: Graduation day"));
        assert!(prompt.contains("- Title: Graduation trip"));
        assert!(prompt.contains("(no description)"));
        assert!(prompt.contains("Respond with ONLY a JSON object"));
    }

    #[test]
    fn test_build_prompt_truncates_source_excerpt() {
        let adjudicator = LlmAdjudicator::new(Arc::new(CannedLlm::new("")));
        let mut candidate = summary("Graduation day", "2010-06-12");
        candidate.source_text = Some("x".repeat(500));
        let existing = summary("Graduation trip", "2010-06-12");

        let prompt = adjudicator.build_prompt(&candidate, &existing);
        let expected = format!("- Source excerpt: {}...", "x".repeat(200));
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&"x".repeat(201)));
    }

    #[tokio::test]
    async fn test_judge_parses_plain_json() {
        let adjudicator = LlmAdjudicator::new(Arc::new(CannedLlm::new(
            r#"{"isDuplicate": true, "confidence": 85, "reasoning": "Same ceremony"}"#,
        )));

        let judgment = adjudicator
            .judge_similarity(&summary("A", "2020-01-01"), &summary("B", "2020-01-01"))
            .await
            .unwrap();
        assert!(judgment.is_duplicate);
        assert_eq!(judgment.confidence, 85);
        assert_eq!(judgment.reasoning, "Same ceremony");
    }

    #[tokio::test]
    async fn test_judge_parses_fenced_json() {
        let adjudicator = LlmAdjudicator::new(Arc::new(CannedLlm::new(
            "```json\n{\"isDuplicate\": false, \"confidence\": 60, \"reasoning\": \"Different years\"}\n```",
        )));

        let judgment = adjudicator
            .judge_similarity(&summary("A", "2020-01-01"), &summary("B", "2021-01-01"))
            .await
            .unwrap();
        assert!(!judgment.is_duplicate);
        assert_eq!(judgment.confidence, 60);
    }

    #[tokio::test]
    async fn test_judge_parses_json_with_preamble() {
        let adjudicator = LlmAdjudicator::new(Arc::new(CannedLlm::new(
            "Looking at both events: {\"isDuplicate\": true, \"confidence\": 75, \"reasoning\": \"Same move\"} is my verdict.",
        )));

        let judgment = adjudicator
            .judge_similarity(&summary("A", "2020-01-01"), &summary("B", "2020-01-01"))
            .await
            .unwrap();
        assert!(judgment.is_duplicate);
        assert_eq!(judgment.confidence, 75);
    }

    #[tokio::test]
    async fn test_judge_clamps_out_of_range_confidence() {
        let adjudicator = LlmAdjudicator::new(Arc::new(CannedLlm::new(
            r#"{"isDuplicate": true, "confidence": 250, "reasoning": ""}"#,
        )));

        let judgment = adjudicator
            .judge_similarity(&summary("A", "2020-01-01"), &summary("B", "2020-01-01"))
            .await
            .unwrap();
        assert_eq!(judgment.confidence, 100);
    }

    #[tokio::test]
    async fn test_judge_malformed_response_is_oracle_error() {
        let adjudicator =
            LlmAdjudicator::new(Arc::new(CannedLlm::new("I cannot answer that question.")));

        let err = adjudicator
            .judge_similarity(&summary("A", "2020-01-01"), &summary("B", "2020-01-01"))
            .await
            .unwrap_err();
        assert!(err.is_oracle_failure());
        assert_eq!(err.code(), ErrorCode::OrcMalformedResponse);
    }

    #[tokio::test]
    async fn test_judge_llm_failure_is_unavailable() {
        let adjudicator = LlmAdjudicator::new(Arc::new(FailingLlm));

        let err = adjudicator
            .judge_similarity(&summary("A", "2020-01-01"), &summary("B", "2020-01-01"))
            .await
            .unwrap_err();
        assert!(err.is_oracle_failure());
        assert_eq!(err.code(), ErrorCode::OrcUnavailable);
    }

    #[tokio::test]
    async fn test_judge_timeout() {
        let adjudicator =
            LlmAdjudicator::with_timeout(Arc::new(SlowLlm), Duration::from_millis(10));

        let err = adjudicator
            .judge_similarity(&summary("A", "2020-01-01"), &summary("B", "2020-01-01"))
            .await
            .unwrap_err();
        assert!(err.is_oracle_failure());
        assert_eq!(err.code(), ErrorCode::OrcTimeout);
    }

    #[tokio::test]
    async fn test_judge_sends_single_user_message_with_tight_options() {
        let llm = Arc::new(CapturingLlm {
            captured: Mutex::new(None),
        });
        let adjudicator = LlmAdjudicator::new(llm.clone());

        adjudicator
            .judge_similarity(&summary("A", "2020-01-01"), &summary("B", "2020-01-01"))
            .await
            .unwrap();

        let captured = llm.captured.lock().unwrap();
        let (messages, options) = captured.as_ref().unwrap();
        assert_eq!(messages.len(), 1);
        let options = options.as_ref().unwrap();
        assert_eq!(options.temperature, Some(0.1));
        assert_eq!(options.max_tokens, Some(200));
    }
}
