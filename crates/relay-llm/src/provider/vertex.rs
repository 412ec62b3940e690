//! Vertex AI `generateContent` provider

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::{StreamExt, future, stream};
use relay_config::VertexConfig;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use url::Url;

use super::{ChunkStream, Provider, UpstreamRequest};
use crate::error::LlmError;
use crate::protocol::vertex::VertexRequest;

/// Vertex AI publisher-model provider
pub struct VertexProvider {
    client: Client,
    base_url: Url,
    project_id: String,
    region: String,
    model: String,
    access_token: Option<SecretString>,
}

impl VertexProvider {
    /// Create from the `[llm.vertex]` configuration
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the regional endpoint is not a valid URL.
    pub fn new(config: &VertexConfig) -> Result<Self, LlmError> {
        let base_url = match &config.base_url {
            Some(url) => url.clone(),
            None => {
                let regional = format!("https://{}-aiplatform.googleapis.com/v1", config.region);
                Url::parse(&regional).map_err(|e| LlmError::Config(format!("invalid endpoint {regional}: {e}")))?
            }
        };

        Ok(Self {
            client: Client::new(),
            base_url,
            project_id: config.project_id.clone(),
            region: config.region.clone(),
            model: config.model.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// `{base}/projects/{p}/locations/{r}/publishers/google/models/{m}:{method}`
    fn method_url(&self, method: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!(
            "{base}/projects/{}/locations/{}/publishers/google/models/{}:{method}",
            self.project_id, self.region, self.model
        )
    }

    fn stream_url(&self) -> String {
        format!("{}?alt=sse", self.method_url("streamGenerateContent"))
    }

    fn generate_url(&self) -> String {
        self.method_url("generateContent")
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn send(&self, url: &str, body: &VertexRequest) -> Result<Response, LlmError> {
        self.authorize(self.client.post(url))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model = %self.model, error = %e, "upstream request failed");
                LlmError::Streaming(e.to_string())
            })
    }
}

/// A stream holding exactly one chunk
fn single_chunk(chunk: Value) -> ChunkStream {
    Box::pin(stream::once(future::ready(Ok(chunk))))
}

/// Parse one SSE payload; non-JSON payloads are passed on as a JSON string
fn parse_event_data(data: &str) -> Option<Value> {
    let data = data.trim();
    if data.is_empty() {
        return None;
    }

    Some(serde_json::from_str(data).unwrap_or_else(|_| Value::String(data.to_owned())))
}

#[async_trait]
impl Provider for VertexProvider {
    fn name(&self) -> &'static str {
        "vertex"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn open_stream(&self, request: &UpstreamRequest) -> Result<ChunkStream, LlmError> {
        let body = VertexRequest::from(request);

        let url = if request.grounding {
            tracing::info!(model = %self.model, "using single-shot generation for search grounding");
            self.generate_url()
        } else {
            self.stream_url()
        };

        tracing::debug!(model = %self.model, contents = body.contents.len(), "sending upstream request");

        let response = self.send(&url, &body).await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(model = %self.model, status = %status, "upstream returned error");

            return Ok(single_chunk(json!({
                "error": text,
                "status_code": status.as_u16(),
            })));
        }

        if request.grounding {
            let chunk: Value = response
                .json()
                .await
                .map_err(|e| LlmError::Upstream(format!("failed to read grounded response: {e}")))?;

            return Ok(single_chunk(chunk));
        }

        let chunks = response.bytes_stream().eventsource().filter_map(|result| {
            future::ready(match result {
                Ok(event) => parse_event_data(&event.data).map(Ok),
                Err(e) => Some(Err(LlmError::Streaming(e.to_string()))),
            })
        });

        Ok(Box::pin(chunks))
    }
}
