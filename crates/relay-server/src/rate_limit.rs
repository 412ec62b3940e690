use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use relay_ratelimit::SlidingWindowLimiter;

/// Hold matching requests until the limiter admits them
///
/// Requests are delayed, never rejected. Only paths containing
/// `path_filter` are counted.
pub async fn rate_limit_middleware(
    limiter: Arc<SlidingWindowLimiter>,
    path_filter: Arc<str>,
    request: Request,
    next: Next,
) -> Response {
    if request.uri().path().contains(&*path_filter) {
        limiter.acquire().await;
    }

    next.run(request).await
}
