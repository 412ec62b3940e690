//! Canonical request -> Vertex AI wire request

use crate::{
    protocol::vertex::{VertexContent, VertexFileData, VertexGenerationConfig, VertexInlineData, VertexPart, VertexRequest, VertexTool},
    provider::UpstreamRequest,
    types::{CanonicalMessage, ContentPart, GenerationOptions, Role},
};

impl From<&UpstreamRequest> for VertexRequest {
    fn from(request: &UpstreamRequest) -> Self {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in &request.messages {
            match message.role {
                Role::System => system_parts.extend(message.parts.iter().map(part_to_vertex)),
                Role::User => contents.push(message_to_vertex(message, "user")),
                Role::Assistant => contents.push(message_to_vertex(message, "model")),
            }
        }

        let system_instruction = (!system_parts.is_empty()).then(|| VertexContent {
            role: None,
            parts: system_parts,
        });

        let generation_config = (!request.options.is_empty()).then(|| (&request.options).into());

        let tools = request.grounding.then(|| vec![VertexTool::default()]);

        Self {
            contents,
            system_instruction,
            generation_config,
            tools,
        }
    }
}

impl From<&GenerationOptions> for VertexGenerationConfig {
    fn from(options: &GenerationOptions) -> Self {
        Self {
            temperature: options.temperature,
            top_p: options.top_p,
            max_output_tokens: options.max_output_tokens,
            stop_sequences: options.stop_sequences.clone(),
        }
    }
}

fn message_to_vertex(message: &CanonicalMessage, role: &str) -> VertexContent {
    VertexContent {
        role: Some(role.to_owned()),
        parts: message.parts.iter().map(part_to_vertex).collect(),
    }
}

fn part_to_vertex(part: &ContentPart) -> VertexPart {
    match part {
        ContentPart::Text { value } => VertexPart::Text(value.clone()),
        ContentPart::ImageRef { locator, mime_type } => image_to_vertex(locator, mime_type),
    }
}

/// Data URIs travel inline, every other locator by reference
fn image_to_vertex(locator: &str, mime_type: &str) -> VertexPart {
    if let Some(rest) = locator.strip_prefix("data:")
        && let Some((header, data)) = rest.split_once(',')
    {
        let declared = header.strip_suffix(";base64").unwrap_or(header);
        let mime_type = if declared.is_empty() { mime_type } else { declared };

        return VertexPart::InlineData(VertexInlineData {
            mime_type: mime_type.to_owned(),
            data: data.to_owned(),
        });
    }

    VertexPart::FileData(VertexFileData {
        mime_type: mime_type.to_owned(),
        file_uri: locator.to_owned(),
    })
}
