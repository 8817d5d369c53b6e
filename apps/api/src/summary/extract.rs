//! Getting from a raw Bedrock reply to the JSON text that should hold the summary.

use serde::Deserialize;

use crate::llm_client::{ContentBlock, ResponseEnvelope};
use crate::summary::SummaryError;

const FENCE: &str = "```";

#[derive(Debug, Deserialize)]
struct InvokeResponseBody {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

/// Returns the generated text of a reply: the first content block with non-empty text.
/// An empty or missing reply is an error, never an empty string.
pub fn generated_text(envelope: &ResponseEnvelope) -> Result<String, SummaryError> {
    match envelope {
        ResponseEnvelope::Converse { message } => {
            let blocks = message.as_deref().ok_or_else(|| {
                SummaryError::Extraction("Converse response has no output message".to_string())
            })?;
            first_text(blocks).ok_or_else(|| {
                SummaryError::Extraction(
                    "Converse output message has no non-empty text block".to_string(),
                )
            })
        }
        ResponseEnvelope::Invoke { body } => {
            let parsed: InvokeResponseBody = serde_json::from_slice(body).map_err(|e| {
                SummaryError::Extraction(format!("InvokeModel response body is not valid JSON: {e}"))
            })?;
            first_text(&parsed.content).ok_or_else(|| {
                SummaryError::Extraction(
                    "InvokeModel response has no non-empty text block".to_string(),
                )
            })
        }
    }
}

/// First text block whose text is not blank. Whitespace-only text counts as no text.
fn first_text(blocks: &[ContentBlock]) -> Option<String> {
    blocks
        .iter()
        .filter(|b| b.block_type == "text")
        .filter_map(|b| b.text.as_deref())
        .find(|t| !t.trim().is_empty())
        .map(str::to_string)
}

/// Isolates the part of `text` most likely to be the JSON payload.
///
/// 1. Text opening with a code fence: the fenced body, minus a leading `json` tag.
/// 2. Otherwise: from the first `{` to the last `}`.
/// 3. Otherwise: the trimmed text as-is.
///
/// Empty or whitespace-only text yields `{}`.
pub fn json_payload(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "{}";
    }

    if trimmed.starts_with(FENCE) {
        let body_start = FENCE.len();
        if let Some(offset) = trimmed[body_start..].find(FENCE) {
            let inner = trimmed[body_start..body_start + offset].trim();
            return strip_json_tag(inner);
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if end > start {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

/// Drops a leading `json` language tag, case-insensitively.
fn strip_json_tag(inner: &str) -> &str {
    match inner.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => inner[4..].trim(),
        _ => inner,
    }
}
