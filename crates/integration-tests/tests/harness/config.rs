//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use relay_config::{Config, ContextConfig, CorsConfig, RateLimitConfig};
use secrecy::SecretString;

/// Project ID every test config uses
pub const TEST_PROJECT: &str = "test-project";

/// Upstream model every test config uses
pub const TEST_MODEL: &str = "gemini-test";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal config pointed at `base_url`, with rate limiting off
    pub fn new(base_url: &str) -> Self {
        let mut config = Config::default();

        config.server.listen_address = Some(SocketAddr::from(([127, 0, 0, 1], 0)));
        config.server.rate_limit.enabled = false;

        config.llm.vertex.project_id = TEST_PROJECT.to_owned();
        config.llm.vertex.region = "us-test1".to_owned();
        config.llm.vertex.model = TEST_MODEL.to_owned();
        config.llm.vertex.base_url = Some(base_url.parse().expect("valid URL"));

        Self { config }
    }

    pub fn with_access_token(mut self, token: &str) -> Self {
        self.config.llm.vertex.access_token = Some(SecretString::from(token.to_owned()));
        self
    }

    pub fn with_context(mut self, max_size: usize, preferred_size: usize) -> Self {
        self.config.llm.context = ContextConfig {
            max_size,
            preferred_size,
        };
        self
    }

    pub fn with_strict_aggregation(mut self) -> Self {
        self.config.llm.strict_aggregation = true;
        self
    }

    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    pub fn with_rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.config.server.rate_limit = config;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
