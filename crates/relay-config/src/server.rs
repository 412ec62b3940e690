use std::net::SocketAddr;

use serde::Deserialize;

use crate::{cors::CorsConfig, health::HealthConfig, rate_limit::RateLimitConfig};

/// Default listen address when none is configured
pub const DEFAULT_LISTEN_ADDRESS: ([u8; 4], u16) = ([0, 0, 0, 0], 8000);

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl ServerConfig {
    /// Configured listen address, falling back to `0.0.0.0:8000`
    pub fn listen_address(&self) -> SocketAddr {
        self.listen_address
            .unwrap_or_else(|| SocketAddr::from(DEFAULT_LISTEN_ADDRESS))
    }
}
