use serde::{Deserialize, Serialize};

/// MIME type assumed for image references that do not declare one
pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Assistant response
    Assistant,
    /// System instruction
    System,
}

impl Role {
    /// Parse an inbound role name
    ///
    /// `model` is accepted as the upstream spelling of `assistant`. Any
    /// other unknown role is treated as `user`, the same as a missing one.
    pub fn from_wire(role: &str) -> Self {
        match role.to_ascii_lowercase().as_str() {
            "assistant" | "model" => Self::Assistant,
            "system" => Self::System,
            _ => Self::User,
        }
    }

    /// Lowercase wire name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// Individual part of a canonical message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content
    Text {
        /// The text string
        value: String,
    },
    /// Reference to an image by URL, storage URI or data URI
    ImageRef {
        /// Where the image lives
        locator: String,
        /// Declared MIME type
        mime_type: String,
    },
}

impl ContentPart {
    /// Build a text part
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text { value: value.into() }
    }

    /// Build an image part with the default MIME type
    pub fn image(locator: impl Into<String>) -> Self {
        Self::ImageRef {
            locator: locator.into(),
            mime_type: DEFAULT_IMAGE_MIME_TYPE.to_owned(),
        }
    }
}

/// One conversation turn in backend-agnostic form
///
/// `parts` is never empty once produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMessage {
    /// Author of the turn
    pub role: Role,
    /// Ordered content parts
    pub parts: Vec<ContentPart>,
}

impl CanonicalMessage {
    /// Concatenate all text parts, ignoring images
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { value } => Some(value.as_str()),
                ContentPart::ImageRef { .. } => None,
            })
            .collect()
    }

    /// Render as a text-only chat message (`{"role", "content"}`)
    pub fn to_text_json(&self) -> serde_json::Value {
        serde_json::json!({
            "role": self.role.as_str(),
            "content": self.text(),
        })
    }
}
