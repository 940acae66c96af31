// Per-client rate limiting for the API routes
// Decision: Fixed window per client key; the window starts at the client's first request
// Decision: Rejected requests do not count against the window
//
// Client key, in order of preference:
// - peer socket address (ConnectInfo)
// - first entry of `X-Forwarded-For`
// - `X-Real-IP`
// - "unknown"

use agentry_core::Error;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::api::ApiError;
use crate::config::RateLimitConfig;

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limit exceeded for `{key}`, retry after {retry_after:?}")]
    Exceeded { key: String, retry_after: Duration },
}

/// Outcome of an allowed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window resets
    pub reset_after: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    clients: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: config.window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn check(&self, key: &str) -> Result<RateLimitDecision, RateLimitError> {
        self.check_at(key, Instant::now())
    }

    /// Count one request for `key` at `now`.
    pub fn check_at(&self, key: &str, now: Instant) -> Result<RateLimitDecision, RateLimitError> {
        let mut clients = self.clients.lock();
        let entry = clients.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        let mut elapsed = now.saturating_duration_since(entry.started);
        if elapsed >= self.window {
            entry.started = now;
            entry.count = 0;
            elapsed = Duration::ZERO;
        }
        let reset_after = self.window - elapsed;

        if entry.count >= self.max_requests {
            return Err(RateLimitError::Exceeded {
                key: key.to_string(),
                retry_after: reset_after,
            });
        }

        entry.count += 1;
        Ok(RateLimitDecision {
            limit: self.max_requests,
            remaining: self.max_requests - entry.count,
            reset_after,
        })
    }

    /// Drop windows that have ended. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut clients = self.clients.lock();
        let before = clients.len();
        clients.retain(|_, w| now.saturating_duration_since(w.started) < self.window);
        before - clients.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().len()
    }
}

/// Purge expired windows once per window length until the runtime shuts down.
pub fn spawn_purge_task(limiter: Arc<FixedWindowLimiter>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(limiter.window());
        // First tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = limiter.purge_expired();
            if removed > 0 {
                tracing::debug!(removed, "Purged expired rate limit windows");
            }
        }
    })
}

/// Axum middleware enforcing the limiter.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);

    match limiter.check(&key) {
        Ok(decision) => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert("ratelimit-limit", HeaderValue::from(decision.limit));
            headers.insert("ratelimit-remaining", HeaderValue::from(decision.remaining));
            headers.insert(
                "ratelimit-reset",
                HeaderValue::from(ceil_secs(decision.reset_after)),
            );
            response
        }
        Err(RateLimitError::Exceeded { key, retry_after }) => {
            tracing::warn!(
                client = %key,
                path = %request.uri().path(),
                retry_after_secs = ceil_secs(retry_after),
                "Rate limit exceeded"
            );
            ApiError::from(Error::RateLimited {
                retry_after: Duration::from_secs(ceil_secs(retry_after)),
            })
            .into_response()
        }
    }
}

fn client_key(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    let headers = request.headers();
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn limiter(max_requests: u32, window_secs: u64) -> FixedWindowLimiter {
        FixedWindowLimiter::new(&RateLimitConfig {
            max_requests,
            window: Duration::from_secs(window_secs),
        })
    }

    #[test]
    fn test_hundred_allowed_then_rejected() {
        let limiter = limiter(100, 900);
        let now = Instant::now();

        for i in 0..100 {
            let decision = limiter.check_at("10.0.0.1", now).unwrap();
            assert_eq!(decision.remaining, 99 - i);
        }
        let err = limiter.check_at("10.0.0.1", now).unwrap_err();
        let RateLimitError::Exceeded { retry_after, .. } = err;
        assert_eq!(retry_after, Duration::from_secs(900));
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = limiter(1, 60);
        let now = Instant::now();
        assert!(limiter.check_at("a", now).is_ok());
        assert!(limiter.check_at("a", now).is_err());
        assert!(limiter.check_at("b", now).is_ok());
    }

    #[test]
    fn test_window_resets() {
        let limiter = limiter(2, 60);
        let start = Instant::now();
        limiter.check_at("a", start).unwrap();
        limiter.check_at("a", start).unwrap();

        let later = start + Duration::from_secs(30);
        let RateLimitError::Exceeded { retry_after, .. } =
            limiter.check_at("a", later).unwrap_err();
        assert_eq!(retry_after, Duration::from_secs(30));

        let next_window = start + Duration::from_secs(60);
        let decision = limiter.check_at("a", next_window).unwrap();
        assert_eq!(decision.remaining, 1);
    }

    #[test]
    fn test_purge_expired() {
        let limiter = limiter(5, 60);
        let start = Instant::now();
        limiter.check_at("old", start).unwrap();
        limiter
            .check_at("fresh", start + Duration::from_secs(50))
            .unwrap();

        let removed = limiter.purge_expired_at(start + Duration::from_secs(70));
        assert_eq!(removed, 1);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_client_key_fallbacks() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&request), "203.0.113.7");

        let request = Request::builder()
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&request), "198.51.100.2");

        let mut request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        assert_eq!(client_key(&request), "127.0.0.1");

        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&request), "unknown");
    }

    #[test]
    fn test_ceil_secs() {
        assert_eq!(ceil_secs(Duration::from_millis(1500)), 2);
        assert_eq!(ceil_secs(Duration::from_secs(3)), 3);
    }
}
