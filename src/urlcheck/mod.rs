//! Liveness checks for stored game URLs.
//!
//! The admin UI batch-verifies that embedded game URLs still resolve.
//! The checker sits behind a trait so endpoint tests can run against a
//! mock without network calls.

use async_trait::async_trait;
use serde::Serialize;

pub mod http;
pub mod mock;

pub use http::HttpUrlChecker;
pub use mock::MockUrlChecker;

/// Outcome of probing a single URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlCheckResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UrlCheckResult {
    pub fn ok(status: u16) -> Self {
        UrlCheckResult {
            valid: status >= 200 && status < 300,
            status: Some(status),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        UrlCheckResult {
            valid: false,
            status: None,
            error: Some(error.into()),
        }
    }
}

/// Probes a URL and reports whether it still serves content.
#[async_trait]
pub trait UrlChecker: Send + Sync {
    async fn check(&self, url: &str) -> UrlCheckResult;
}
