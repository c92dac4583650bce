//! Signed admin session tokens and the cookie that carries them.
//!
//! Single shared secret, single fixed username. The token payload is
//! `admin:<issued_unix_millis>`, signed with sha256 over the payload
//! and the secret, and the whole thing base64-encoded into an
//! http-only cookie. Verification recomputes the signature and
//! enforces a 24-hour expiry. There is no rotation or revocation.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};

pub const ADMIN_USERNAME: &str = "admin";
pub const SESSION_COOKIE: &str = "admin_token";
pub const SESSION_MAX_AGE_SECS: i64 = 24 * 60 * 60;

const SESSION_MAX_AGE_MS: i64 = SESSION_MAX_AGE_SECS * 1000;

/// Issue a token for the fixed admin user at the given instant.
pub fn issue_token(secret: &str, now_ms: i64) -> String {
    let payload = format!("{}:{}", ADMIN_USERNAME, now_ms);
    let sig = sign(&payload, secret);
    BASE64.encode(format!("{}:{}", payload, sig))
}

/// Verify a token: signature, username, and 24-hour expiry window.
pub fn verify_token(token: &str, secret: &str, now_ms: i64) -> bool {
    let decoded = match BASE64.decode(token) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let decoded = match String::from_utf8(decoded) {
        Ok(s) => s,
        Err(_) => return false,
    };

    // token layout: user:issued_ms:sig — the signature is the last segment
    let (payload, sig) = match decoded.rsplit_once(':') {
        Some(parts) => parts,
        None => return false,
    };
    if sign(payload, secret) != sig {
        return false;
    }

    let (user, issued) = match payload.split_once(':') {
        Some(parts) => parts,
        None => return false,
    };
    if user != ADMIN_USERNAME {
        return false;
    }
    let issued_ms = match issued.parse::<i64>() {
        Ok(ms) => ms,
        Err(_) => return false,
    };

    now_ms - issued_ms < SESSION_MAX_AGE_MS
}

fn sign(payload: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hasher.update(b":");
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Build the Set-Cookie value that installs a session token.
pub fn session_cookie(token: &str, secure: bool) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}{}",
        SESSION_COOKIE,
        token,
        SESSION_MAX_AGE_SECS,
        if secure { "; Secure" } else { "" }
    )
}

/// Build the Set-Cookie value that clears the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0{}",
        SESSION_COOKIE,
        if secure { "; Secure" } else { "" }
    )
}

/// Pull the session token out of the request's Cookie header, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    for pair in raw.split(';') {
        let pair = pair.trim();
        if let Some(value) = pair.strip_prefix(SESSION_COOKIE) {
            if let Some(token) = value.strip_prefix('=') {
                return Some(token);
            }
        }
    }
    None
}

/// Whether the request carries a currently valid admin session.
pub fn has_valid_session(headers: &HeaderMap, secret: &str, now_ms: i64) -> bool {
    match token_from_headers(headers) {
        Some(token) => verify_token(token, secret, now_ms),
        None => false,
    }
}
