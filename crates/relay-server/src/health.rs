//! Health and server information endpoints

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use relay_config::Config;
use serde::Serialize;

const SERVER_NAME: &str = "relay";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Body of the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    status: &'static str,
    version: &'static str,
    model: String,
    project: String,
    region: String,
    rate_limit: String,
    preferred_context_size: String,
    max_context_size: String,
}

impl HealthReport {
    pub fn from_config(config: &Config) -> Self {
        let vertex = &config.llm.vertex;
        let rate_limit = &config.server.rate_limit;

        let rate_limit = if rate_limit.enabled {
            format!("{} requests per {}", rate_limit.requests, rate_limit.window)
        } else {
            "disabled".to_owned()
        };

        Self {
            status: "ok",
            version: VERSION,
            model: vertex.model.clone(),
            project: vertex.project_id.clone(),
            region: vertex.region.clone(),
            rate_limit,
            preferred_context_size: format!("{} tokens", config.llm.context.preferred_size),
            max_context_size: format!("{} tokens", config.llm.context.max_size),
        }
    }
}

/// Body of `GET /v1/info`
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    server: &'static str,
    version: &'static str,
    vertex_ai: VertexInfo,
    max_context_size: usize,
    preferred_context_size: usize,
    capabilities: [&'static str; 3],
    protocol_version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct VertexInfo {
    project_id: String,
    region: String,
    model: String,
}

impl ServerInfo {
    pub fn from_config(config: &Config) -> Self {
        let vertex = &config.llm.vertex;

        Self {
            server: SERVER_NAME,
            version: VERSION,
            vertex_ai: VertexInfo {
                project_id: vertex.project_id.clone(),
                region: vertex.region.clone(),
                model: vertex.model.clone(),
            },
            max_context_size: config.llm.context.max_size,
            preferred_context_size: config.llm.context.preferred_size,
            capabilities: ["text", "vision", "streaming"],
            protocol_version: "mcp-v1",
        }
    }
}

pub async fn health_handler(State(report): State<Arc<HealthReport>>) -> Json<HealthReport> {
    Json(HealthReport::clone(&report))
}

pub async fn info_handler(State(info): State<Arc<ServerInfo>>) -> Json<ServerInfo> {
    Json(ServerInfo::clone(&info))
}
