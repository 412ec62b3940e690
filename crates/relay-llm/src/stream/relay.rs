use futures_util::{Stream, StreamExt, stream};
use serde_json::Value;

use crate::{
    error::LlmError,
    normalize::normalize_chunk,
    types::{ErrorKind, OutboundEvent},
};

enum RelayState<S> {
    Open(S),
    Closed,
}

/// Relay upstream chunks as outbound events
///
/// Emits one event per chunk in arrival order, then exactly one terminal
/// event: `Done` on exhaustion, or the first error. A model error chunk is
/// forwarded as is; a failure of the upstream stream itself becomes a
/// `server_error`. After the terminal event the upstream is dropped and not
/// polled again. Dropping the returned stream drops the upstream too.
pub fn relay<S>(chunks: S) -> impl Stream<Item = OutboundEvent> + Send
where
    S: Stream<Item = Result<Value, LlmError>> + Send + Unpin,
{
    stream::unfold(RelayState::Open(chunks), |state| async move {
        let RelayState::Open(mut chunks) = state else {
            return None;
        };

        let event = match chunks.next().await {
            None => OutboundEvent::Done,
            Some(Err(error)) => {
                tracing::error!(error = %error, "upstream stream failed");
                OutboundEvent::error(ErrorKind::ServerError, error.to_string())
            }
            Some(Ok(raw)) => match normalize_chunk(&raw) {
                Ok(event) => event,
                Err(unrecognized) => {
                    tracing::warn!(chunk = %unrecognized.preview, "unparseable upstream chunk");
                    OutboundEvent::delta("")
                }
            },
        };

        let next = if event.is_terminal() {
            RelayState::Closed
        } else {
            RelayState::Open(chunks)
        };

        Some((event, next))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use futures_util::stream;
    use serde_json::json;

    use super::*;

    async fn collect(chunks: Vec<Result<Value, LlmError>>) -> Vec<OutboundEvent> {
        relay(stream::iter(chunks)).collect().await
    }

    #[tokio::test]
    async fn deltas_then_done() {
        let events = collect(vec![Ok(json!({"text": "He"})), Ok(json!({"text": "llo"}))]).await;

        assert_eq!(
            events,
            vec![OutboundEvent::delta("He"), OutboundEvent::delta("llo"), OutboundEvent::Done]
        );
    }

    #[tokio::test]
    async fn empty_upstream_yields_only_done() {
        assert_eq!(collect(Vec::new()).await, vec![OutboundEvent::Done]);
    }

    #[tokio::test]
    async fn unparseable_chunk_degrades_to_empty_delta() {
        let events = collect(vec![Ok(json!({"weird": true})), Ok(json!({"text": "ok"}))]).await;

        assert_eq!(
            events,
            vec![OutboundEvent::delta(""), OutboundEvent::delta("ok"), OutboundEvent::Done]
        );
    }

    #[tokio::test]
    async fn kth_error_chunk_ends_stream_without_done() {
        let events = collect(vec![
            Ok(json!({"text": "a"})),
            Ok(json!({"text": "b"})),
            Ok(json!({"error": "overloaded"})),
            Ok(json!({"text": "never"})),
        ])
        .await;

        assert_eq!(
            events,
            vec![
                OutboundEvent::delta("a"),
                OutboundEvent::delta("b"),
                OutboundEvent::error(ErrorKind::ModelError, "overloaded"),
            ]
        );
    }

    #[tokio::test]
    async fn transport_failure_becomes_server_error() {
        let events = collect(vec![
            Ok(json!({"text": "a"})),
            Err(LlmError::Streaming("connection reset".to_owned())),
        ])
        .await;

        assert_eq!(events.len(), 2);
        let OutboundEvent::Error(error) = &events[1] else {
            panic!("expected error, got {:?}", events[1]);
        };
        assert_eq!(error.kind, ErrorKind::ServerError);
        assert!(error.message.contains("connection reset"));
    }

    #[tokio::test]
    async fn upstream_is_not_polled_after_error() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulled);

        let chunks = stream::iter(vec![
            json!({"error": "bad"}),
            json!({"text": "x"}),
            json!({"text": "y"}),
        ])
        .map(move |chunk| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(chunk)
        });

        let events: Vec<_> = relay(chunks).collect().await;

        assert_eq!(events.len(), 1);
        assert_eq!(pulled.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropping_relay_stops_pulling() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulled);

        let chunks = stream::iter((0..100).map(|i| json!({"text": i.to_string()}))).map(move |chunk| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(chunk)
        });

        let first_two: Vec<_> = relay(chunks).take(2).collect().await;

        assert_eq!(first_two.len(), 2);
        assert_eq!(pulled.load(Ordering::SeqCst), 2);
    }
}
