use serde_json::Value;
use thiserror::Error;

use crate::types::{ErrorKind, OutboundEvent};

/// A chunk that matched none of the known upstream shapes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized chunk shape: {preview}")]
pub struct UnrecognizedChunk {
    /// Truncated JSON rendering of the chunk
    pub preview: String,
}

const PREVIEW_CHARS: usize = 200;

impl UnrecognizedChunk {
    fn new(raw: &Value) -> Self {
        let rendered = raw.to_string();
        let preview = match rendered.char_indices().nth(PREVIEW_CHARS) {
            Some((cut, _)) => format!("{}...", &rendered[..cut]),
            None => rendered,
        };

        Self { preview }
    }
}

type ShapeMatcher = fn(&Value) -> Option<OutboundEvent>;

/// Known chunk shapes, tried in priority order
const SHAPE_MATCHERS: [ShapeMatcher; 4] = [match_error, match_chat_completion, match_text, match_candidates];

/// Convert one upstream chunk into an outbound event
///
/// Never produces `Done`. The caller decides what to do with an
/// unrecognized chunk: the relay degrades it to an empty delta, the strict
/// aggregation path fails the request.
pub fn normalize_chunk(raw: &Value) -> Result<OutboundEvent, UnrecognizedChunk> {
    SHAPE_MATCHERS
        .iter()
        .find_map(|matcher| matcher(raw))
        .ok_or_else(|| UnrecognizedChunk::new(raw))
}

/// `{"error": ...}` with a non-null value
fn match_error(raw: &Value) -> Option<OutboundEvent> {
    let error = raw.get("error").filter(|error| !error.is_null())?;

    let message = match error {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };

    Some(OutboundEvent::error(ErrorKind::ModelError, message))
}

/// `choices[0].delta.content` or `choices[0].message.content`
///
/// A `delta` or `message` object without string content (a role-only first
/// chunk or a final chunk carrying only `finish_reason`) is an empty delta.
fn match_chat_completion(raw: &Value) -> Option<OutboundEvent> {
    let choice = raw.get("choices")?.get(0)?;

    let bodies: Vec<&Value> = ["delta", "message"]
        .iter()
        .filter_map(|key| choice.get(key).filter(|body| body.is_object()))
        .collect();

    if bodies.is_empty() {
        return None;
    }

    let text = bodies
        .iter()
        .find_map(|body| body.get("content")?.as_str())
        .unwrap_or_default();

    Some(OutboundEvent::delta(text))
}

/// `{"text": "..."}`
fn match_text(raw: &Value) -> Option<OutboundEvent> {
    raw.get("text")?.as_str().map(OutboundEvent::delta)
}

/// `candidates[0].content.parts[*].text`
///
/// A candidate without content (a final chunk carrying only a finish reason
/// or usage metadata) is a recognized empty delta.
fn match_candidates(raw: &Value) -> Option<OutboundEvent> {
    let candidates = raw.get("candidates")?.as_array()?;

    let text: String = candidates
        .first()
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    Some(OutboundEvent::delta(text))
}
