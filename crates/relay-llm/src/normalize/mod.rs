//! Conversion of loosely-typed inbound and upstream values into canonical types

mod chunk;
mod message;
mod params;

pub use chunk::{UnrecognizedChunk, normalize_chunk};
pub use message::{normalize_message, normalize_messages};
pub use params::map_config;
