//! Origin and user-agent heuristics for the public listing.
//!
//! Rejects requests that don't look like they came from the site's own
//! frontend: no same-site referer, an automation user agent, no
//! recognizable browser signature, or an Accept header that doesn't
//! want JSON.

use axum::http::header::{ACCEPT, HOST, REFERER, USER_AGENT};
use axum::http::HeaderMap;

/// Substrings that mark a user agent as automation.
const AUTOMATION_SIGNATURES: &[&str] = &[
    "curl",
    "wget",
    "python-requests",
    "python/",
    "scrapy",
    "bot",
    "spider",
    "crawl",
    "headless",
    "phantom",
    "selenium",
    "puppeteer",
    "playwright",
    "go-http-client",
    "java/",
    "libwww",
    "httpclient",
];

/// Substrings expected in any mainstream browser user agent.
const BROWSER_SIGNATURES: &[&str] = &["mozilla", "chrome", "safari", "firefox", "edge", "opera"];

/// Why a request was rejected, or `Allowed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicVerdict {
    Allowed,
    MissingReferer,
    ForeignReferer,
    MissingUserAgent,
    AutomationUserAgent,
    UnrecognizedUserAgent,
    NotJsonAccept,
}

impl HeuristicVerdict {
    pub fn message(&self) -> &'static str {
        match self {
            HeuristicVerdict::Allowed => "allowed",
            HeuristicVerdict::MissingReferer => "missing referer",
            HeuristicVerdict::ForeignReferer => "cross-site referer",
            HeuristicVerdict::MissingUserAgent => "missing user agent",
            HeuristicVerdict::AutomationUserAgent => "automated user agent",
            HeuristicVerdict::UnrecognizedUserAgent => "unrecognized user agent",
            HeuristicVerdict::NotJsonAccept => "request does not accept JSON",
        }
    }
}

impl std::fmt::Display for HeuristicVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Evaluate the gate heuristics against a request's headers.
pub fn evaluate(headers: &HeaderMap) -> HeuristicVerdict {
    let referer = match header_str(headers, REFERER.as_str()) {
        Some(r) if !r.is_empty() => r,
        _ => return HeuristicVerdict::MissingReferer,
    };
    if let Some(host) = header_str(headers, HOST.as_str()) {
        if !same_site(referer, host) {
            return HeuristicVerdict::ForeignReferer;
        }
    }

    let ua = match header_str(headers, USER_AGENT.as_str()) {
        Some(ua) if !ua.is_empty() => ua.to_lowercase(),
        _ => return HeuristicVerdict::MissingUserAgent,
    };
    if AUTOMATION_SIGNATURES.iter().any(|sig| ua.contains(sig)) {
        return HeuristicVerdict::AutomationUserAgent;
    }
    if !BROWSER_SIGNATURES.iter().any(|sig| ua.contains(sig)) {
        return HeuristicVerdict::UnrecognizedUserAgent;
    }

    let accept = header_str(headers, ACCEPT.as_str()).unwrap_or("");
    if !accept.contains("application/json") && !accept.contains("*/*") {
        return HeuristicVerdict::NotJsonAccept;
    }

    HeuristicVerdict::Allowed
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Compare the referer's host against the request's Host header.
fn same_site(referer: &str, host: &str) -> bool {
    let rest = match referer.split_once("://") {
        Some((_, rest)) => rest,
        None => referer,
    };
    let referer_host = rest.split('/').next().unwrap_or("");
    referer_host.eq_ignore_ascii_case(host)
}
