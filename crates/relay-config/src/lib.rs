#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
pub mod llm;
mod loader;
pub mod rate_limit;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use llm::*;
pub use rate_limit::*;
pub use server::*;
pub use telemetry::*;

/// Top-level relay configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream model and context budget configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
