use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::RateLimitError;

/// Rolling-window request limiter shared by the whole process
///
/// Keeps the acceptance time of every request inside the window. When the
/// window is full, `acquire` sleeps until the oldest acceptance leaves it.
/// The lock is held across that sleep, so waiters are admitted strictly in
/// arrival order.
pub struct SlidingWindowLimiter {
    limit: usize,
    window: Duration,
    enabled: bool,
    accepted: Mutex<VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    /// Create a limiter admitting `limit` requests per `window`
    pub fn new(limit: u32, window: Duration, enabled: bool) -> Result<Self, RateLimitError> {
        if enabled && limit == 0 {
            return Err(RateLimitError::Config("limit must be > 0".to_string()));
        }

        if enabled && window.is_zero() {
            return Err(RateLimitError::Config("rate limit window must be > 0".to_string()));
        }

        let limit = usize::try_from(limit).map_err(|_| RateLimitError::Config("limit out of range".to_string()))?;

        Ok(Self {
            limit,
            window,
            enabled,
            accepted: Mutex::new(VecDeque::new()),
        })
    }

    /// Wait until a request may proceed, then record it
    pub async fn acquire(&self) {
        if !self.enabled {
            return;
        }

        let mut accepted = self.accepted.lock().await;

        loop {
            let now = Instant::now();

            while accepted
                .front()
                .is_some_and(|&at| now.duration_since(at) >= self.window)
            {
                accepted.pop_front();
            }

            // Held entries are younger than the window, so the wait is never zero
            match accepted.front() {
                Some(&oldest) if accepted.len() >= self.limit => {
                    let wait = (oldest + self.window).saturating_duration_since(now);
                    tracing::warn!(wait_secs = wait.as_secs_f64(), "rate limit reached, waiting");
                    tokio::time::sleep(wait).await;
                }
                _ => {
                    accepted.push_back(now);
                    return;
                }
            }
        }
    }

    /// Number of acceptances currently recorded in the window
    pub async fn recorded(&self) -> usize {
        self.accepted.lock().await.len()
    }
}
