use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use http::HeaderValue;

/// Response header carrying handling time in seconds
pub const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Record how long the inner service took to produce the response head
pub async fn process_time_middleware(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let mut response = next.run(request).await;

    let elapsed = started.elapsed().as_secs_f64();
    if let Ok(value) = HeaderValue::from_str(&elapsed.to_string()) {
        response.headers_mut().insert(PROCESS_TIME_HEADER, value);
    }

    response
}
