//! Mock URL checker for testing without network calls.

use super::{UrlCheckResult, UrlChecker};
use async_trait::async_trait;
use std::collections::HashMap;

/// Mock checker returning canned results per URL.
///
/// URLs without a canned result report a connection failure.
#[derive(Debug, Clone, Default)]
pub struct MockUrlChecker {
    responses: HashMap<String, UrlCheckResult>,
}

impl MockUrlChecker {
    /// Create a mock with no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canned result for a URL.
    pub fn with_response(mut self, url: &str, result: UrlCheckResult) -> Self {
        self.responses.insert(url.to_string(), result);
        self
    }
}

#[async_trait]
impl UrlChecker for MockUrlChecker {
    async fn check(&self, url: &str) -> UrlCheckResult {
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| UrlCheckResult::failed("connection refused"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_response_returned() {
        let mock = MockUrlChecker::new().with_response("https://up.example.com", UrlCheckResult::ok(200));
        let result = mock.check("https://up.example.com").await;
        assert!(result.valid);
        assert_eq!(result.status, Some(200));
    }

    #[tokio::test]
    async fn test_unknown_url_fails() {
        let mock = MockUrlChecker::new();
        let result = mock.check("https://down.example.com").await;
        assert!(!result.valid);
        assert!(result.error.is_some());
    }
}
