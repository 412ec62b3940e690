//! Canonical results -> inbound chat wire format

use crate::{
    protocol::openai::{AssistantMessage, ChatCompletion, CompletionChoice, CompletionUsage, StreamFrame},
    types::{AggregatedResponse, OutboundEvent},
};

impl From<AggregatedResponse> for ChatCompletion {
    fn from(response: AggregatedResponse) -> Self {
        Self {
            id: response.id,
            object: "chat.completion".to_owned(),
            created: relay_core::unix_timestamp(),
            model: response.model,
            choices: vec![CompletionChoice {
                message: AssistantMessage::new(response.content),
                index: 0,
                finish_reason: response.finish_reason,
            }],
            usage: CompletionUsage {
                prompt_tokens: response.usage.prompt,
                completion_tokens: response.usage.completion,
                total_tokens: response.usage.total,
            },
        }
    }
}

impl StreamFrame {
    /// Frame for an outbound event, `None` for `Done`
    pub fn from_event(event: OutboundEvent) -> Option<Self> {
        match event {
            OutboundEvent::Delta { text } => Some(Self::Message(AssistantMessage::new(text))),
            OutboundEvent::Error(error) => Some(Self::Error(error)),
            OutboundEvent::Done => None,
        }
    }
}
