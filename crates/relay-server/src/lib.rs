//! HTTP server assembly: routes, middleware and serving

#![allow(clippy::must_use_candidate)]

mod cors;
mod health;
mod process_time;
mod rate_limit;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use relay_config::Config;
use relay_llm::LlmState;
use tower_http::trace::TraceLayer;

pub use health::{HealthReport, ServerInfo};
pub use process_time::PROCESS_TIME_HEADER;

/// Path of the server information endpoint
pub const INFO_PATH: &str = "/v1/info";

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream provider or the rate limiter cannot
    /// be constructed
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let llm_state = LlmState::from_config(&config.llm)?;
        Self::with_llm_state(config, llm_state)
    }

    /// Build the server around an existing LLM state
    ///
    /// # Errors
    ///
    /// Returns an error if the rate limiter cannot be constructed
    pub fn with_llm_state(config: &Config, llm_state: LlmState) -> anyhow::Result<Self> {
        let mut app = Router::new();

        if config.server.health.enabled {
            let report = Arc::new(HealthReport::from_config(config));
            app = app.route(
                &config.server.health.path,
                axum::routing::get(health::health_handler).with_state(report),
            );
        }

        let info = Arc::new(ServerInfo::from_config(config));
        app = app.route(INFO_PATH, axum::routing::get(health::info_handler).with_state(info));

        app = app.merge(relay_llm::llm_router(llm_state));

        // Apply middleware layers (innermost first)

        app = app.layer(axum::middleware::from_fn(process_time::process_time_middleware));

        let rate_limit = &config.server.rate_limit;
        if rate_limit.enabled {
            let limiter = Arc::new(relay_ratelimit::create_request_limiter(rate_limit)?);
            let path_filter: Arc<str> = Arc::from(rate_limit.path_filter.as_str());
            app = app.layer(axum::middleware::from_fn(move |req, next| {
                let limiter = Arc::clone(&limiter);
                let path_filter = Arc::clone(&path_filter);
                async move { rate_limit::rate_limit_middleware(limiter, path_filter, req, next).await }
            }));
        }

        app = app.layer(TraceLayer::new_for_http());

        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        let vertex = &config.llm.vertex;
        tracing::info!(
            model = %vertex.model,
            project = %vertex.project_id,
            region = %vertex.region,
            preferred_context_size = config.llm.context.preferred_size,
            max_context_size = config.llm.context.max_size,
            rate_limit_enabled = rate_limit.enabled,
            rate_limit_requests = rate_limit.requests,
            "relay configured"
        );

        Ok(Self {
            router: app,
            listen_address: config.server.listen_address(),
        })
    }

    /// Get the configured listen address
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        tracing::info!("server stopped");
        Ok(())
    }
}
