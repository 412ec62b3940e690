#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod error;
mod window;

pub use error::RateLimitError;
pub use window::SlidingWindowLimiter;

use relay_config::RateLimitConfig;

/// Create the process-wide request limiter from configuration
pub fn create_request_limiter(config: &RateLimitConfig) -> Result<SlidingWindowLimiter, RateLimitError> {
    let window = config
        .window_duration()
        .map_err(|e| RateLimitError::Config(e.to_string()))?;

    SlidingWindowLimiter::new(config.requests, window, config.enabled)
}
