use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use thiserror::Error;

/// Category of a client-facing failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Upstream reported a failure in a chunk
    ModelError,
    /// Failure inside the relay, aggregation or transport glue
    ServerError,
    /// A chunk could not be converted
    ConversionError,
    /// A chunk had an unrecognized shape on the strict extraction path
    FormatError,
    /// The upstream stream could not be established or read
    StreamError,
}

/// Error payload carried by a terminal error event
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct EventError {
    /// Failure category
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Human-readable description
    pub message: String,
}

impl EventError {
    /// Create an error payload
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Event emitted to the client for one request
///
/// Nothing follows an `Error` or `Done` for the same request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// Incremental text
    Delta {
        /// Text generated since the previous delta
        text: String,
    },
    /// Terminal failure
    Error(EventError),
    /// Terminal success sentinel
    Done,
}

impl OutboundEvent {
    /// Build a text delta
    pub fn delta(text: impl Into<String>) -> Self {
        Self::Delta { text: text.into() }
    }

    /// Build a terminal error event
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Error(EventError::new(kind, message))
    }

    /// Whether this event ends the stream
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Error(_) | Self::Done)
    }
}
