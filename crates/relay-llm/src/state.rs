//! Request orchestration shared by the HTTP handlers

use std::sync::Arc;

use futures_util::stream::{self, BoxStream, StreamExt};
use relay_config::{ContextConfig, LlmConfig};
use serde_json::Value;

use crate::{
    context::ContextWindow,
    error::LlmError,
    normalize::{map_config, normalize_message, normalize_messages},
    protocol::openai::{ChatRequest, ModelInfo},
    provider::{Provider, UpstreamRequest, VertexProvider},
    stream::{ExtractionMode, aggregate, relay},
    types::{AggregatedResponse, ErrorKind, EventError, OutboundEvent},
};

/// Shared state for LLM route handlers
#[derive(Clone)]
pub struct LlmState {
    inner: Arc<LlmStateInner>,
}

struct LlmStateInner {
    provider: Arc<dyn Provider>,
    context: ContextConfig,
    extraction: ExtractionMode,
}

impl LlmState {
    /// Build state with the Vertex provider described by `config`
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let provider = VertexProvider::new(&config.vertex)?;
        Ok(Self::with_provider(Arc::new(provider), config))
    }

    /// Build state around an existing provider
    pub fn with_provider(provider: Arc<dyn Provider>, config: &LlmConfig) -> Self {
        let extraction = if config.strict_aggregation {
            ExtractionMode::Strict
        } else {
            ExtractionMode::Lenient
        };

        Self {
            inner: Arc::new(LlmStateInner {
                provider,
                context: config.context,
                extraction,
            }),
        }
    }

    /// Model every request is forwarded to
    pub fn model(&self) -> &str {
        self.inner.provider.model()
    }

    /// Bound the conversation and convert it into an upstream request
    ///
    /// Messages that normalize to nothing are skipped, then the rest pass
    /// through a fresh context window, so the oldest ones are dropped when
    /// the conversation exceeds the size budget.
    pub fn prepare(&self, request: &ChatRequest) -> UpstreamRequest {
        let mut window = ContextWindow::<Value>::new(self.inner.context.max_size, self.inner.context.preferred_size);
        let mut usable = 0;
        for message in request.messages.iter().filter(|message| normalize_message(message).is_some()) {
            window.append(message.clone());
            usable += 1;
        }

        let retained = window.into_entries();
        if retained.len() < usable {
            tracing::info!(
                received = request.messages.len(),
                usable,
                retained = retained.len(),
                "conversation trimmed to context budget"
            );
        }

        UpstreamRequest {
            messages: normalize_messages(&retained),
            options: map_config(Some(&request.parameter_bag())),
            grounding: request.wants_grounding(),
        }
    }

    /// Run a request as an event stream
    ///
    /// Always ends with exactly one `Done` or one error event. Failing to
    /// open the upstream yields a lone `stream_error`.
    pub async fn stream(&self, request: &ChatRequest) -> BoxStream<'static, OutboundEvent> {
        let upstream = self.prepare(request);

        match self.inner.provider.open_stream(&upstream).await {
            Ok(chunks) => relay(chunks).boxed(),
            Err(error) => {
                tracing::error!(provider = self.inner.provider.name(), error = %error, "failed to open upstream stream");
                let event = OutboundEvent::Error(error.into_event(ErrorKind::StreamError));
                stream::once(async move { event }).boxed()
            }
        }
    }

    /// Run a request to completion
    pub async fn complete(&self, request: &ChatRequest) -> Result<AggregatedResponse, EventError> {
        let upstream = self.prepare(request);

        let chunks = self.inner.provider.open_stream(&upstream).await.map_err(|error| {
            tracing::error!(provider = self.inner.provider.name(), error = %error, "failed to open upstream stream");
            error.into_event(ErrorKind::StreamError)
        })?;

        let serialized_prompt = serde_json::to_string(&request.messages).unwrap_or_default();

        aggregate(chunks, request.model_or_unknown(), &serialized_prompt, self.inner.extraction).await
    }

    /// Models exposed by `GET /v1/models`
    pub fn list_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: self.model().to_owned(),
            object: "model".to_owned(),
            created: relay_core::unix_timestamp(),
            owned_by: "google".to_owned(),
        }]
    }
}
