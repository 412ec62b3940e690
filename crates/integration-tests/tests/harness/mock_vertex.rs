//! Mock Vertex AI backend for integration tests
//!
//! Serves `streamGenerateContent` as SSE from a chunk script and
//! `generateContent` with a single canned response, recording every
//! request it receives.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// What the mock answers with
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Stream each value as one SSE `data:` line
    Chunks(Vec<Value>),
    /// Stream these raw `data:` payloads verbatim
    RawEvents(Vec<String>),
    /// Reject every request with this status and body
    Status(u16, String),
}

/// A request the mock received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path segment after `models/`, e.g. `gemini-test:streamGenerateContent`
    pub model_action: String,
    pub project: String,
    pub location: String,
    pub authorization: Option<String>,
    pub body: Value,
}

struct MockState {
    behavior: Behavior,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Mock Vertex AI server bound to a random local port
pub struct MockVertex {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockVertex {
    /// Start a mock streaming the given chunks
    pub async fn start(chunks: Vec<Value>) -> anyhow::Result<Self> {
        Self::start_with(Behavior::Chunks(chunks)).await
    }

    /// Start a mock streaming `{"text": ...}` chunks
    pub async fn start_text(texts: &[&str]) -> anyhow::Result<Self> {
        Self::start(texts.iter().map(|text| json!({ "text": text })).collect()).await
    }

    pub async fn start_with(behavior: Behavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            behavior,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route(
                "/v1/projects/{project}/locations/{location}/publishers/google/models/{model_action}",
                routing::post(handle_model_action),
            )
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for `[llm.vertex] base_url`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// The single request received; panics otherwise
    pub fn only_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one upstream request");
        requests.into_iter().next().unwrap()
    }
}

impl Drop for MockVertex {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// A base URL on which nothing is listening
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v1")
}

async fn handle_model_action(
    State(state): State<Arc<MockState>>,
    Path((project, location, model_action)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let streaming = model_action.ends_with(":streamGenerateContent");

    state.requests.lock().unwrap().push(RecordedRequest {
        model_action,
        project,
        location,
        authorization,
        body,
    });

    match &state.behavior {
        Behavior::Status(status, text) => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, text.clone()).into_response()
        }
        Behavior::Chunks(chunks) if streaming => sse(chunks.iter().map(Value::to_string)),
        Behavior::RawEvents(events) if streaming => sse(events.iter().cloned()),
        Behavior::Chunks(chunks) => Json(merge_candidates(chunks)).into_response(),
        Behavior::RawEvents(_) => (StatusCode::OK, "not json").into_response(),
    }
}

fn sse(payloads: impl Iterator<Item = String>) -> Response {
    let body: String = payloads.map(|payload| format!("data: {payload}\r\n\r\n")).collect();

    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .body(Body::from(body))
        .unwrap()
}

/// Single-shot answer: every chunk's text as parts of one candidate
fn merge_candidates(chunks: &[Value]) -> Value {
    let parts: Vec<Value> = chunks
        .iter()
        .filter_map(|chunk| chunk.get("text").cloned())
        .map(|text| json!({ "text": text }))
        .collect();

    json!({
        "candidates": [{
            "content": {"role": "model", "parts": parts},
            "finishReason": "STOP",
            "groundingMetadata": {"webSearchQueries": ["mock"]},
        }]
    })
}
