//! JSON parsing utilities for LLM responses.
//!
//! Models wrap JSON in markdown fences, preambles, or reasoning tags
//! more often than they return it bare. These helpers strip the wrapping
//! and hand the first JSON object to serde.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::{MemoirError, MemoirResult};

static CODE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[a-zA-Z0-9]*\n?([\s\S]*?)\n?```$").unwrap());

static THINK_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").unwrap());

/// Remove code block fences and thinking tags from a response.
pub fn remove_code_blocks(content: &str) -> String {
    let content = content.trim();

    let content = CODE_BLOCK_RE
        .captures(content)
        .map(|c| c.get(1).map(|m| m.as_str().trim()).unwrap_or(content))
        .unwrap_or(content);

    THINK_TAG_RE.replace_all(content, "").trim().to_string()
}

/// Extract the outermost JSON object from free-form text.
///
/// Takes the span between the first `{` and the last `}`, which covers
/// models that add a prose preamble or trailer around the object.
pub fn extract_json_object(text: &str) -> MemoirResult<String> {
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(text[start..=end].to_string()),
        _ => Err(MemoirError::parse(format!(
            "No JSON object found in response: {}",
            truncate_for_error(text)
        ))),
    }
}

/// Parse a typed value out of a raw LLM response.
pub fn parse_json<T: DeserializeOwned>(response: &str) -> MemoirResult<T> {
    let cleaned = remove_code_blocks(response);
    let json_str = extract_json_object(&cleaned)?;

    serde_json::from_str(&json_str).map_err(|e| {
        MemoirError::parse(format!(
            "Failed to parse JSON response: {} (in: {})",
            e,
            truncate_for_error(&json_str)
        ))
    })
}

fn truncate_for_error(text: &str) -> String {
    const MAX: usize = 120;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Verdict {
        ok: bool,
        score: u8,
    }

    #[test]
    fn test_remove_code_blocks() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        let result = remove_code_blocks(input);
        assert_eq!(result, r#"{"key": "value"}"#);
    }

    #[test]
    fn test_remove_think_tags() {
        let input = "<think>the events look alike</think>{\"ok\": true}";
        let result = remove_code_blocks(input);
        assert_eq!(result, r#"{"ok": true}"#);
    }

    #[test]
    fn test_extract_json_with_prose_preamble() {
        let input = "Here is my analysis:\n{\"ok\": true, \"score\": 80}\nHope that helps!";
        let result = extract_json_object(input).unwrap();
        assert_eq!(result, r#"{"ok": true, "score": 80}"#);
    }

    #[test]
    fn test_extract_json_no_object() {
        let result = extract_json_object("I could not determine an answer.");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_json_typed() {
        let input = "```json\n{\"ok\": true, \"score\": 95}\n```";
        let verdict: Verdict = parse_json(input).unwrap();
        assert_eq!(verdict, Verdict { ok: true, score: 95 });
    }

    #[test]
    fn test_parse_json_invalid_payload() {
        let result: MemoirResult<Verdict> = parse_json("{\"ok\": \"not a bool\"}");
        assert!(result.is_err());
    }
}
