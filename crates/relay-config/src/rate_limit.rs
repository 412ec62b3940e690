use std::time::Duration;

use serde::Deserialize;

/// Process-wide request rate limiting
///
/// Requests over the limit are delayed until a slot in the rolling
/// window frees up, not rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Whether requests are throttled at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Maximum requests accepted per window
    #[serde(default = "default_requests")]
    pub requests: u32,
    /// Window duration (e.g. "1m", "30s")
    #[serde(default = "default_window")]
    pub window: String,
    /// Only paths containing this fragment are throttled
    #[serde(default = "default_path_filter")]
    pub path_filter: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            requests: default_requests(),
            window: default_window(),
            path_filter: default_path_filter(),
        }
    }
}

impl RateLimitConfig {
    /// Parse the configured window into a `Duration`
    ///
    /// # Errors
    ///
    /// Returns an error if the window string is not a valid duration
    pub fn window_duration(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.window)
            .map_err(|e| anyhow::anyhow!("invalid rate limit window '{}': {e}", self.window))
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_requests() -> u32 {
    150
}

fn default_window() -> String {
    "1m".to_string()
}

fn default_path_filter() -> String {
    "/v1/".to_string()
}
