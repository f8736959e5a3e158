//! Per-client rate limiting middleware.
//!
//! Every inbound request takes one token from a bucket keyed by the client
//! address before it can reach a route handler. Clients that drain their
//! bucket receive a 429 response until enough tokens have refilled.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    Json,
    extract::{ConnectInfo, FromRef, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;

/// Controls how many requests each client may make in a time window.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// The bucket capacity, i.e. the number of requests a client may burst.
    pub max_requests: u32,
    /// The window over which a full bucket's worth of tokens refills.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
        }
    }
}

/// A token bucket rate limiter shared between requests.
///
/// Tokens refill continuously at `max_requests / window`, capped at the
/// bucket capacity.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Create a rate limiter with empty buckets.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Take one token from `key`'s bucket.
    ///
    /// Returns `false` when the bucket is empty. Limiter failures fail open:
    /// a poisoned lock admits the request rather than rejecting it.
    pub fn try_acquire(&self, key: &str) -> bool {
        let capacity = f64::from(self.config.max_requests);
        let refill_per_second = capacity / self.config.window.as_secs_f64();

        let mut buckets = match self.buckets.lock() {
            Ok(buckets) => buckets,
            Err(error) => {
                tracing::error!("Rate limit error: {error}");
                return true;
            }
        };

        let now = Instant::now();
        let bucket = buckets.entry(key.to_owned()).or_insert(TokenBucket {
            tokens: capacity,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * refill_per_second).min(capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// The state needed to rate limit requests.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    /// The limiter shared by all routes.
    pub limiter: RateLimiter,
}

impl FromRef<AppState> for RateLimitState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            limiter: state.rate_limiter.clone(),
        }
    }
}

/// Reject requests from clients that have exhausted their token bucket.
///
/// Requests over the limit are answered with a 429 response and never reach
/// a route handler.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);

    if !state.limiter.try_acquire(&key) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Too many requests, please try again later" })),
        )
            .into_response();
    }

    next.run(request).await
}

/// The bucket key for a request: the peer address when the server was started
/// with connect info, otherwise the forwarding header, otherwise a shared
/// global key.
fn client_key(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(',').next().unwrap_or(value).trim().to_owned())
        .unwrap_or_else(|| "global".to_owned())
}
