//! Login, logout, and session check. One shared password, one fixed
//! admin identity, cookie-carried token.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::AppState;
use crate::error::AppError;
use crate::session;

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub password: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.password != state.config.admin_password {
        warn!("failed admin login attempt");
        return Err(AppError::Unauthorized("invalid password".to_string()));
    }

    let token = session::issue_token(&state.config.admin_password, Utc::now().timestamp_millis());
    let cookie = session::session_cookie(&token, state.config.environment.is_production());
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("invalid cookie header: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    info!("admin session issued");

    Ok((
        headers,
        Json(json!({"success": true, "message": "Login successful"})),
    ))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let cookie = session::clear_session_cookie(state.config.environment.is_production());
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("invalid cookie header: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    Ok((
        headers,
        Json(json!({"success": true, "message": "Logout successful"})),
    ))
}

/// GET /api/auth/check
pub async fn check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, Json<serde_json::Value>) {
    let now_ms = Utc::now().timestamp_millis();
    if session::has_valid_session(&headers, &state.config.admin_password, now_ms) {
        (StatusCode::OK, Json(json!({"authenticated": true})))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"authenticated": false})),
        )
    }
}
