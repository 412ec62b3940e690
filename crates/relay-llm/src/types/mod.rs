//! Internal canonical types
//!
//! These types are backend-agnostic and serve as the normalized internal
//! representation that the inbound wire format converts to and the upstream
//! wire format converts from.

pub mod event;
pub mod message;
pub mod options;
pub mod response;

pub use event::{ErrorKind, EventError, OutboundEvent};
pub use message::{CanonicalMessage, ContentPart, DEFAULT_IMAGE_MIME_TYPE, Role};
pub use options::GenerationOptions;
pub use response::{AggregatedResponse, FINISH_REASON_STOP, UsageEstimate};
