//! Axum route handlers for the chat endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use futures_util::stream::{BoxStream, Stream, StreamExt};
use relay_core::HttpError;

use crate::protocol::openai::{ChatCompletion, ChatRequest, DONE_SENTINEL, ErrorEnvelope, StreamFrame};
use crate::state::LlmState;
use crate::types::{EventError, OutboundEvent};

/// Build the LLM router with all endpoints
pub fn llm_router(state: LlmState) -> Router {
    Router::new()
        .route("/v1/chat/completions", routing::post(chat_completions))
        .route("/v1/models/{model_id}/chat", routing::post(model_chat))
        .route("/v1/models", routing::get(list_models))
        .with_state(state)
}

/// Handle `POST /v1/chat/completions`
async fn chat_completions(State(state): State<LlmState>, body: Result<Json<ChatRequest>, JsonRejection>) -> Response {
    match body {
        Ok(Json(request)) => respond(&state, request).await,
        Err(rejection) => invalid_request(&rejection),
    }
}

/// Handle `POST /v1/models/{model_id}/chat`; the path wins over the body
async fn model_chat(
    State(state): State<LlmState>,
    Path(model_id): Path<String>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(mut request)) => {
            request.model = Some(model_id);
            respond(&state, request).await
        }
        Err(rejection) => invalid_request(&rejection),
    }
}

/// Handle `GET /v1/models`
async fn list_models(State(state): State<LlmState>) -> Response {
    Json(state.list_models()).into_response()
}

async fn respond(state: &LlmState, request: ChatRequest) -> Response {
    tracing::debug!(
        model = request.model_or_unknown(),
        messages = request.messages.len(),
        stream = request.wants_stream(),
        "chat request"
    );

    if request.wants_stream() {
        sse_response(state.stream(&request).await).into_response()
    } else {
        match state.complete(&request).await {
            Ok(response) => Json(ChatCompletion::from(response)).into_response(),
            Err(error) => error_response(error),
        }
    }
}

/// Frame events as SSE `data:` lines
///
/// The HTTP status is always 200; a failure is the final frame.
fn sse_response(events: BoxStream<'static, OutboundEvent>) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let frames = events.map(|event| match StreamFrame::from_event(event) {
        Some(frame) => Event::default().json_data(frame),
        None => Ok(Event::default().data(DONE_SENTINEL)),
    });

    Sse::new(frames).keep_alive(KeepAlive::default())
}

fn error_response(error: EventError) -> Response {
    let status = error.status_code();
    tracing::warn!(status = %status, error = %error, "chat request failed");

    (status, Json(ErrorEnvelope { error })).into_response()
}

fn invalid_request(rejection: &JsonRejection) -> Response {
    let body = serde_json::json!({
        "error": {
            "type": "invalid_request_error",
            "message": rejection.body_text(),
        }
    });

    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use relay_config::LlmConfig;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::state::tests::{ScriptedProvider, state_with};

    fn router(chunks: Vec<Value>) -> Router {
        llm_router(state_with(Arc::new(ScriptedProvider::new(chunks)), &LlmConfig::default()))
    }

    fn post(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn non_streaming_completion() {
        let response = router(vec![json!({"text": "He"}), json!({"text": "llo"})])
            .oneshot(post(
                "/v1/chat/completions",
                &json!({"model": "g", "messages": [{"role": "user", "content": "hi"}]}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["object"], "chat.completion");
        assert_eq!(body["model"], "g");
        assert_eq!(body["choices"][0]["message"]["content"], "Hello");
        assert_eq!(body["choices"][0]["finish_reason"], "stop");
        assert_eq!(body["usage"]["completion_tokens"], 1);
    }

    #[tokio::test]
    async fn path_model_overrides_body() {
        let response = router(vec![json!({"text": "x"})])
            .oneshot(post("/v1/models/from-path/chat", &json!({"model": "from-body", "messages": []})))
            .await
            .unwrap();

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["model"], "from-path");
    }

    #[tokio::test]
    async fn model_error_is_bad_gateway_envelope() {
        let response = router(vec![json!({"text": "partial"}), json!({"error": "quota exceeded"})])
            .oneshot(post("/v1/chat/completions", &json!({"messages": []})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body, json!({"error": {"type": "model_error", "message": "quota exceeded"}}));
    }

    #[tokio::test]
    async fn streaming_frames_end_with_done() {
        let response = router(vec![json!({"text": "He"}), json!({"text": "llo"})])
            .oneshot(post("/v1/chat/completions", &json!({"messages": [], "stream": true})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");

        let text = body_text(response).await;
        let data: Vec<&str> = text.lines().filter_map(|line| line.strip_prefix("data: ")).collect();
        assert_eq!(
            data,
            vec![
                r#"{"message":{"role":"assistant","content":"He"}}"#,
                r#"{"message":{"role":"assistant","content":"llo"}}"#,
                "[DONE]",
            ]
        );
    }

    #[tokio::test]
    async fn streaming_error_frame_replaces_done() {
        let response = router(vec![json!({"error": "blocked"})])
            .oneshot(post("/v1/chat/completions", &json!({"messages": [], "stream": true})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        let data: Vec<&str> = text.lines().filter_map(|line| line.strip_prefix("data: ")).collect();
        assert_eq!(data, vec![r#"{"error":{"type":"model_error","message":"blocked"}}"#]);
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_request() {
        let request = Request::post("/v1/chat/completions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = router(Vec::new()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn models_endpoint_lists_configured_model() {
        let response = router(Vec::new())
            .oneshot(Request::get("/v1/models").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body[0]["id"], "gemini-test");
        assert_eq!(body[0]["object"], "model");
    }
}
