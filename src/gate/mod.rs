//! Best-effort anti-scraping gate for the public listing endpoint.
//!
//! Two independent checks: a per-client rate limit and a set of
//! origin/agent header heuristics. Both are trivially spoofable by
//! forging headers; this is a nuisance barrier, not a security
//! boundary.

pub mod heuristics;
pub mod rate_limit;

pub use heuristics::HeuristicVerdict;
pub use rate_limit::{RateDecision, RateLimitConfig, RateLimiter};

use axum::http::HeaderMap;

/// Identify the client for rate limiting.
///
/// First hop of `x-forwarded-for`, then `x-real-ip`, then a shared
/// bucket. The process sits behind a single reverse proxy, so the
/// forwarded header is the real peer address in practice.
pub fn client_key(headers: &HeaderMap) -> String {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = xff.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    if let Some(ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let ip = ip.trim();
        if !ip.is_empty() {
            return ip.to_string();
        }
    }
    "unknown".to_string()
}
