//! Drivers that turn an upstream chunk stream into client-facing output
//!
//! [`relay`] emits events as chunks arrive; [`aggregate`] consumes the whole
//! stream into one response. Both stop at the first error.

mod aggregate;
mod relay;

pub use aggregate::{ExtractionMode, aggregate};
pub use relay::relay;
