//! Vertex AI `generateContent` wire format types
//!
//! Responses are not modelled here: upstream chunks are kept as raw JSON
//! values and recognized by the chunk normalizer.

use serde::{Deserialize, Serialize};

/// `generateContent` / `streamGenerateContent` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexRequest {
    /// Conversation contents
    pub contents: Vec<VertexContent>,
    /// System instruction assembled from system messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<VertexContent>,
    /// Generation configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<VertexGenerationConfig>,
    /// Tool definitions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<VertexTool>>,
}

/// Content object containing role and parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexContent {
    /// Role ("user" or "model"); absent on system instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts
    pub parts: Vec<VertexPart>,
}

/// Individual part within a content object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VertexPart {
    /// Text content
    Text(String),
    /// Base64 data carried in the request
    InlineData(VertexInlineData),
    /// Data referenced by URI
    FileData(VertexFileData),
}

/// Inline base64 data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexInlineData {
    pub mime_type: String,
    /// Base64-encoded payload
    pub data: String,
}

/// Data referenced by URI (`gs://` or `https://`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexFileData {
    pub mime_type: String,
    pub file_uri: String,
}

/// Generation configuration parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexGenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

/// Tool definition
///
/// Only search grounding is supported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexTool {
    pub google_search: GoogleSearch,
}

/// Marker object enabling Google Search grounding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleSearch {}
