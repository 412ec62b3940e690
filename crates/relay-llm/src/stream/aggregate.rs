use futures_util::{Stream, StreamExt};
use serde_json::Value;

use crate::{
    error::LlmError,
    normalize::normalize_chunk,
    types::{AggregatedResponse, ErrorKind, EventError, FINISH_REASON_STOP, OutboundEvent, UsageEstimate},
};

/// How the aggregator treats chunks of unrecognized shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Contribute nothing and keep going, like the streaming relay
    #[default]
    Lenient,
    /// Fail the request with `format_error`
    Strict,
}

/// Consume a chunk stream into one complete response
///
/// The first error ends consumption and is returned alone; content
/// collected so far is discarded. `serialized_prompt` is the serialized
/// inbound message list, used only for the prompt size estimate.
pub async fn aggregate<S>(
    mut chunks: S,
    model: &str,
    serialized_prompt: &str,
    mode: ExtractionMode,
) -> Result<AggregatedResponse, EventError>
where
    S: Stream<Item = Result<Value, LlmError>> + Unpin,
{
    let mut content = String::new();

    while let Some(chunk) = chunks.next().await {
        let raw = chunk.map_err(|error| {
            tracing::error!(error = %error, "upstream stream failed during aggregation");
            error.into_event(ErrorKind::ServerError)
        })?;

        match normalize_chunk(&raw) {
            Ok(OutboundEvent::Delta { text }) => content.push_str(&text),
            Ok(OutboundEvent::Error(error)) => return Err(error),
            Ok(OutboundEvent::Done) => break,
            Err(unrecognized) => match mode {
                ExtractionMode::Lenient => {
                    tracing::warn!(chunk = %unrecognized.preview, "unparseable upstream chunk");
                }
                ExtractionMode::Strict => {
                    return Err(EventError::new(ErrorKind::FormatError, unrecognized.to_string()));
                }
            },
        }
    }

    let usage = UsageEstimate::from_lengths(serialized_prompt, &content);

    Ok(AggregatedResponse {
        id: format!("chatcmpl-{}", uuid::Uuid::new_v4()),
        model: model.to_owned(),
        content,
        finish_reason: FINISH_REASON_STOP.to_owned(),
        usage,
    })
}
