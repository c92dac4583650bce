//! reqwest-backed URL checker.

use super::{UrlCheckResult, UrlChecker};
use async_trait::async_trait;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(10);
const CHECK_USER_AGENT: &str = "gameshelf-bot/1.0";

/// Checks URLs with a HEAD request and a short timeout.
#[derive(Debug, Clone)]
pub struct HttpUrlChecker {
    client: reqwest::Client,
}

impl HttpUrlChecker {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(CHECK_TIMEOUT)
            .user_agent(CHECK_USER_AGENT)
            .build()
            // builder only fails on TLS backend misconfiguration
            .unwrap_or_else(|_| reqwest::Client::new());
        HttpUrlChecker { client }
    }
}

impl Default for HttpUrlChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlChecker for HttpUrlChecker {
    async fn check(&self, url: &str) -> UrlCheckResult {
        match self.client.head(url).send().await {
            Ok(response) => UrlCheckResult::ok(response.status().as_u16()),
            Err(e) => UrlCheckResult::failed(e.to_string()),
        }
    }
}
