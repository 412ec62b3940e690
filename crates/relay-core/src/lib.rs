//! Shared primitives for the relay workspace

mod error;
mod time;

pub use error::HttpError;
pub use time::unix_timestamp;
