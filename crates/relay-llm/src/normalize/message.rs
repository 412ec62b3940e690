use serde_json::Value;

use crate::types::{CanonicalMessage, ContentPart, DEFAULT_IMAGE_MIME_TYPE, Role};

/// Convert raw inbound messages into canonical messages, preserving order
///
/// Parsing is lenient: a message whose `content` is neither a string nor a
/// list, or whose list yields no usable parts, is dropped without error.
pub fn normalize_messages(raw_messages: &[Value]) -> Vec<CanonicalMessage> {
    raw_messages.iter().filter_map(normalize_message).collect()
}

/// Convert one raw message, or `None` if it carries no usable content
pub fn normalize_message(raw: &Value) -> Option<CanonicalMessage> {
    let role = raw
        .get("role")
        .and_then(Value::as_str)
        .map_or(Role::User, Role::from_wire);

    let parts = match raw.get("content") {
        Some(Value::String(text)) => vec![ContentPart::text(text.as_str())],
        Some(Value::Array(entries)) => entries.iter().filter_map(normalize_part).collect(),
        _ => {
            tracing::debug!(role = role.as_str(), "skipping message with unsupported content");
            return None;
        }
    };

    if parts.is_empty() {
        tracing::debug!(role = role.as_str(), "skipping message without usable parts");
        return None;
    }

    Some(CanonicalMessage { role, parts })
}

fn normalize_part(entry: &Value) -> Option<ContentPart> {
    if let Value::String(text) = entry {
        return Some(ContentPart::text(text.as_str()));
    }

    match entry.get("type").and_then(Value::as_str)? {
        "text" => {
            let text = entry.get("text").and_then(Value::as_str).unwrap_or_default();
            Some(ContentPart::text(text))
        }
        "image_url" => Some(normalize_image(entry)),
        _ => None,
    }
}

/// Build an image reference from an `image_url` part
///
/// Accepts both `{"image_url": {"url": ...}}` and `{"image_url": "..."}`.
/// A `mime_type` on the part or on the nested object overrides the default.
fn normalize_image(entry: &Value) -> ContentPart {
    let image_url = entry.get("image_url");

    let locator = match image_url {
        Some(Value::String(url)) => url.as_str(),
        Some(nested) => nested.get("url").and_then(Value::as_str).unwrap_or_default(),
        None => "",
    };

    let mime_type = entry
        .get("mime_type")
        .or_else(|| image_url.and_then(|nested| nested.get("mime_type")))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_IMAGE_MIME_TYPE);

    ContentPart::ImageRef {
        locator: locator.to_owned(),
        mime_type: mime_type.to_owned(),
    }
}
