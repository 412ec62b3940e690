//! Upstream backend abstraction

pub mod vertex;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use serde_json::Value;

use crate::{
    error::LlmError,
    types::{CanonicalMessage, GenerationOptions},
};

pub use vertex::VertexProvider;

/// Raw upstream chunks in arrival order
///
/// An `Err` item is a failure of the stream itself, not a per-chunk error
/// payload; those arrive as `Ok` values carrying an `error` field.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Value, LlmError>> + Send>>;

/// Everything the upstream needs for one generation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamRequest {
    pub messages: Vec<CanonicalMessage>,
    pub options: GenerationOptions,
    /// Ground the answer with web search
    pub grounding: bool,
}

/// Trait implemented by upstream backends
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Model every request is sent to
    fn model(&self) -> &str;

    /// Open a chunk stream for a request
    ///
    /// Fails only when no stream can be established at all. An upstream
    /// that answers with an error status still yields a stream, holding a
    /// single error chunk.
    async fn open_stream(&self, request: &UpstreamRequest) -> Result<ChunkStream, LlmError>;
}
