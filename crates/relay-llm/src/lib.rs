//! Protocol-translation core of the relay
//!
//! Normalizes chat-completion style requests into canonical messages,
//! forwards them to the Vertex AI upstream, and turns the upstream chunk
//! stream back into either a client-facing event stream or one aggregated
//! chat-completion response.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod context;
pub mod convert;
pub mod error;
#[cfg(feature = "http")]
pub mod handler;
pub mod normalize;
pub mod protocol;
pub mod provider;
pub mod state;
pub mod stream;
pub mod types;

pub use context::{AppendOutcome, ContextWindow, EstimateSize};
pub use error::LlmError;
#[cfg(feature = "http")]
pub use handler::llm_router;
pub use normalize::{map_config, normalize_chunk, normalize_messages};
pub use provider::{ChunkStream, Provider, UpstreamRequest};
pub use state::LlmState;
pub use stream::{ExtractionMode, aggregate, relay};
pub use types::{AggregatedResponse, CanonicalMessage, ContentPart, ErrorKind, EventError, GenerationOptions, OutboundEvent, Role};
