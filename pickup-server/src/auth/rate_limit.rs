//! Application-layer rate limiting for login and general API routes
//!
//! Sliding window per (route, client): each admission purges timestamps that
//! fell out of the window, checks the remaining count against the limit, and
//! records the request only when admitted. Purge-check-record runs under a
//! single lock acquisition, so concurrent requests from one client never
//! under- or over-count.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;
use shared::util::now_millis;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Throttled,
}

#[derive(Clone)]
pub struct RateLimiter {
    /// route name -> (client id -> recent request timestamps, ms)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, Vec<i64>>>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Admit or throttle a request from `client_id` on `route`
    pub async fn admit(
        &self,
        route: &'static str,
        client_id: &str,
        limit: u32,
        window_ms: i64,
    ) -> Admission {
        self.admit_at(route, client_id, limit, window_ms, now_millis())
            .await
    }

    async fn admit_at(
        &self,
        route: &'static str,
        client_id: &str,
        limit: u32,
        window_ms: i64,
        now_ms: i64,
    ) -> Admission {
        let mut map = self.inner.lock().await;
        let window = map
            .entry(route)
            .or_default()
            .entry(client_id.to_owned())
            .or_default();

        window.retain(|&ts| ts > now_ms - window_ms);
        if window.len() >= limit as usize {
            // Throttled requests are not recorded
            return Admission::Throttled;
        }
        window.push(now_ms);
        Admission::Allowed
    }

    /// Drop timestamps older than 5 minutes and forget idle clients,
    /// bounding memory across many one-off visitors
    pub async fn cleanup(&self) {
        const MAX_AGE_MS: i64 = 300_000;
        let cutoff = now_millis() - MAX_AGE_MS;

        let mut map = self.inner.lock().await;
        for clients in map.values_mut() {
            for window in clients.values_mut() {
                window.retain(|&ts| ts > cutoff);
            }
            clients.retain(|_, window| !window.is_empty());
        }
        map.retain(|_, clients| !clients.is_empty());
    }
}

/// Extract client IP: X-Forwarded-For header first (reverse proxy), then
/// peer address.
pub fn extract_ip(request: &Request) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
    {
        // X-Forwarded-For can be comma-separated; first entry is the original client
        if let Some(first) = val.split(',').next() {
            let ip = first.trim();
            if !ip.is_empty() {
                return ip.to_owned();
            }
        }
    }

    // Fallback: peer address from extensions (ConnectInfo)
    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Rate limit middleware for login (long low-frequency window)
pub async fn login_rate_limit(
    State(state): State<crate::core::AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_ip(&request);
    let admission = state
        .rate_limiter
        .admit(
            "login",
            &ip,
            state.config.login_rate_limit,
            state.config.login_rate_window_ms,
        )
        .await;
    if admission == Admission::Throttled {
        tracing::warn!(client = %ip, route = "login", "Rate limit hit");
        return Err(AppError::throttled());
    }
    Ok(next.run(request).await)
}

/// Rate limit middleware for the main API (short high-frequency window)
pub async fn api_rate_limit(
    State(state): State<crate::core::AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_ip(&request);
    let admission = state
        .rate_limiter
        .admit(
            "api",
            &ip,
            state.config.api_rate_limit,
            state.config.api_rate_window_ms,
        )
        .await;
    if admission == Admission::Throttled {
        return Err(AppError::throttled());
    }
    Ok(next.run(request).await)
}
