use http::StatusCode;
use relay_core::HttpError;
use thiserror::Error;

use crate::types::{ErrorKind, EventError};

/// Errors raised while talking to the upstream backend
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider could not be built from configuration
    #[error("invalid provider configuration: {0}")]
    Config(String),

    /// Upstream answered but the answer could not be used
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Opening or reading the upstream stream failed
    #[error("streaming error: {0}")]
    Streaming(String),
}

impl LlmError {
    /// Convert into a client-facing error event of the given kind
    pub fn into_event(self, kind: ErrorKind) -> EventError {
        EventError::new(kind, self.to_string())
    }
}

impl HttpError for EventError {
    fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::ModelError | ErrorKind::StreamError | ErrorKind::FormatError | ErrorKind::ConversionError => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    fn error_type(&self) -> &str {
        self.kind.as_ref()
    }

    fn client_message(&self) -> String {
        self.message.clone()
    }
}
