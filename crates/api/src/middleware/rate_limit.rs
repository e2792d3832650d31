//! In-process token-bucket rate limiting keyed by client address.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::state::AppState;

/// Buckets retained before idle ones are pruned.
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Key used when the client address is unknown (no connect info and no
/// trusted forwarding header).
const UNKNOWN_CLIENT: &str = "unknown";

/// Capacity and refill rate of one bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitPolicy {
    pub capacity: f64,
    pub refill_per_sec: f64,
}

impl RateLimitPolicy {
    /// 5 attempts per 15 minutes.
    pub fn auth() -> Self {
        Self::per_window(5, Duration::from_secs(15 * 60))
    }

    /// 3 emails per hour.
    pub fn email() -> Self {
        Self::per_window(3, Duration::from_secs(60 * 60))
    }

    /// `requests` per `window`, refilling continuously.
    pub fn per_window(requests: u32, window: Duration) -> Self {
        Self {
            capacity: f64::from(requests),
            refill_per_sec: f64::from(requests) / window.as_secs_f64(),
        }
    }
}

#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

pub struct RateLimiter {
    buckets: Mutex<HashMap<String, Bucket>>,
    policy: RateLimitPolicy,
    scope: &'static str,
}

impl RateLimiter {
    pub fn new(scope: &'static str, policy: RateLimitPolicy) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            policy,
            scope,
        }
    }

    /// Take one token for `key`. Returns `false` when the bucket is empty.
    pub async fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now()).await
    }

    async fn allow_at(&self, key: &str, now: Instant) -> bool {
        let cfg = self.policy;
        let mut lock = self.buckets.lock().await;

        if lock.len() >= MAX_TRACKED_CLIENTS && !lock.contains_key(key) {
            lock.retain(|_, b| {
                let elapsed = now.saturating_duration_since(b.last_refill).as_secs_f64();
                b.tokens + elapsed * cfg.refill_per_sec < cfg.capacity
            });
        }

        let bucket = lock.entry(key.to_string()).or_insert_with(|| Bucket {
            tokens: cfg.capacity,
            last_refill: now,
        });
        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        bucket.last_refill = now;
        bucket.tokens = (bucket.tokens + elapsed * cfg.refill_per_sec).min(cfg.capacity);
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            tracing::warn!(scope = self.scope, client = key, "Rate limit exceeded");
            false
        }
    }
}

/// Rate-limit key for the request.
///
/// With `trust_proxy_headers` the first `x-forwarded-for` hop, then
/// `x-real-ip`, is used. Otherwise only the peer socket address counts, so
/// clients cannot pick their own bucket.
pub fn client_key(parts: &Parts, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(forwarded) = forwarded_client(parts) {
            return forwarded.to_string();
        }
    }
    match parts.extensions.get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => addr.ip().to_string(),
        None => UNKNOWN_CLIENT.to_string(),
    }
}

fn forwarded_client(parts: &Parts) -> Option<&str> {
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    header("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header("x-real-ip"))
}

/// Consumes one auth-attempt token; rejects with 429 when exhausted.
pub struct AuthRateLimit;

impl FromRequestParts<AppState> for AuthRateLimit {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if state
            .auth_limiter
            .allow(&client_key(parts, state.config.trust_proxy_headers))
            .await {
            Ok(AuthRateLimit)
        } else {
            Err(AppError::RateLimited)
        }
    }
}

/// Consumes one email-send token; rejects with 429 when exhausted.
pub struct EmailRateLimit;

impl FromRequestParts<AppState> for EmailRateLimit {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if state
            .email_limiter
            .allow(&client_key(parts, state.config.trust_proxy_headers))
            .await {
            Ok(EmailRateLimit)
        } else {
            Err(AppError::RateLimited)
        }
    }
}
