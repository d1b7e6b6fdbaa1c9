//! Per-client rate limiting middleware.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::RateLimitConfig;
use crate::http::error::ApiError;

/// A simple token bucket rate limiter.
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_update: now,
        }
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();

        // Refill tokens
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Allows `max_requests` per `window_secs` for each client, refilled continuously.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, TokenBucket>>,
    capacity: f64,
    refill_per_sec: f64,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let capacity = f64::from(config.max_requests.max(1));
        Self {
            buckets: Mutex::new(HashMap::new()),
            capacity,
            refill_per_sec: capacity / config.window_secs.max(1) as f64,
        }
    }

    /// Take one token for `client`. Returns false when the client is over its limit.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> bool {
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
        let bucket = buckets
            .entry(client.to_string())
            .or_insert_with(|| TokenBucket::new(self.capacity, now));

        bucket.try_acquire(self.capacity, self.refill_per_sec, now)
    }
}

/// Middleware function for per-IP rate limiting.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if limiter.check(&client) {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, "Rate limit exceeded");
        ApiError::RateLimited.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn limiter(max_requests: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            enabled: true,
            window_secs,
            max_requests,
        })
    }

    #[test]
    fn test_burst_up_to_capacity_then_reject() {
        let limiter = limiter(3, 60);
        let now = Instant::now();
        assert!(limiter.check_at("10.0.0.1", now));
        assert!(limiter.check_at("10.0.0.1", now));
        assert!(limiter.check_at("10.0.0.1", now));
        assert!(!limiter.check_at("10.0.0.1", now));

        // Other clients have their own bucket.
        assert!(limiter.check_at("10.0.0.2", now));
    }

    #[test]
    fn test_tokens_refill_over_window() {
        let limiter = limiter(2, 10);
        let now = Instant::now();
        assert!(limiter.check_at("c", now));
        assert!(limiter.check_at("c", now));
        assert!(!limiter.check_at("c", now));

        // 2 tokens per 10s: one token back after 5s.
        assert!(limiter.check_at("c", now + Duration::from_secs(5)));
        assert!(!limiter.check_at("c", now + Duration::from_secs(5)));
    }
}
