//! Chat-completion style wire format for the inbound HTTP surface

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::EventError;

/// Tool name that turns on search grounding
pub const GROUNDING_TOOL: &str = "google_search";

/// Model name reported when a request does not name one
pub const UNKNOWN_MODEL: &str = "unknown";

// -- Request types --

/// Inbound chat request
///
/// Messages stay untyped until the message normalizer reads them. Keys
/// other than the named ones are kept in `extra` so that top-level
/// OpenAI-style parameters (`temperature`, `max_tokens`, ...) are honoured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model named by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Raw conversation messages
    #[serde(default)]
    pub messages: Vec<Value>,
    /// Generation parameter bag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
    /// Whether to stream the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Tool requests, e.g. `[{"tool": "google_search"}]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    /// Shorthand for search grounding (`"google_search"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding: Option<String>,
    /// Every other top-level key
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatRequest {
    pub fn wants_stream(&self) -> bool {
        self.stream.unwrap_or(false)
    }

    /// Whether search grounding was requested
    pub fn wants_grounding(&self) -> bool {
        let via_tools = self.tools.iter().flatten().any(|tool| {
            tool.get("tool").and_then(Value::as_str) == Some(GROUNDING_TOOL)
        });

        via_tools || self.grounding.as_deref() == Some(GROUNDING_TOOL)
    }

    /// Top-level extra keys overlaid by `parameters`
    pub fn parameter_bag(&self) -> Map<String, Value> {
        let mut bag = self.extra.clone();

        if let Some(parameters) = &self.parameters {
            bag.extend(parameters.iter().map(|(key, value)| (key.clone(), value.clone())));
        }

        bag
    }

    pub fn model_or_unknown(&self) -> &str {
        self.model.as_deref().unwrap_or(UNKNOWN_MODEL)
    }
}

// -- Response types --

/// Non-streaming success body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub id: String,
    /// Always "chat.completion"
    pub object: String,
    /// Unix timestamp in seconds
    pub created: u64,
    pub model: String,
    pub choices: Vec<CompletionChoice>,
    pub usage: CompletionUsage,
}

/// Single choice in a completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionChoice {
    pub message: AssistantMessage,
    pub index: u32,
    pub finish_reason: String,
}

/// Assistant message in a completion or stream frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantMessage {
    /// Always "assistant"
    pub role: String,
    pub content: String,
}

impl AssistantMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_owned(),
            content: content.into(),
        }
    }
}

/// Estimated usage, character based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Payload of one SSE `data:` line
///
/// Serializes as `{"message": {...}}` or `{"error": {...}}`; the terminal
/// success sentinel is the literal `[DONE]` and has no frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamFrame {
    Message(AssistantMessage),
    Error(EventError),
}

/// SSE data for the terminal success sentinel
pub const DONE_SENTINEL: &str = "[DONE]";

/// Non-streaming error body, `{"error": {"type", "message"}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: EventError,
}

// -- Models list types --

/// Entry of `GET /v1/models`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    /// Always "model"
    pub object: String,
    pub created: u64,
    pub owned_by: String,
}
