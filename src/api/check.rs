//! URL liveness endpoints: single ad-hoc checks and admin batch checks
//! against stored games.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{require_admin, AppState};
use crate::error::AppError;
use crate::urlcheck::UrlCheckResult;

#[derive(Debug, Deserialize)]
pub struct CheckUrlQuery {
    pub url: Option<String>,
}

/// GET /api/games/check?url=...
pub async fn check_url(
    Query(params): Query<CheckUrlQuery>,
    State(state): State<AppState>,
) -> Result<Json<UrlCheckResult>, AppError> {
    let url = params
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("url parameter required".to_string()))?;

    Ok(Json(state.url_checker.check(&url).await))
}

#[derive(Debug, Deserialize)]
pub struct CheckGamesPayload {
    pub game_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct GameCheckEntry {
    pub game_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_url: Option<String>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /api/games/check (admin) — batch-check stored games by id.
pub async fn check_games(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CheckGamesPayload>,
) -> Result<Json<Value>, AppError> {
    require_admin(&headers, &state.config)?;

    if payload.game_ids.is_empty() {
        return Err(AppError::BadRequest(
            "game_ids must not be empty".to_string(),
        ));
    }

    let mut results = Vec::with_capacity(payload.game_ids.len());
    for game_id in payload.game_ids {
        match state.repo.get_game(game_id).await? {
            None => results.push(GameCheckEntry {
                game_id,
                game_name: None,
                game_url: None,
                valid: false,
                status: None,
                error: Some("game not found".to_string()),
            }),
            Some(game) => {
                let outcome = state.url_checker.check(&game.game_url).await;
                results.push(GameCheckEntry {
                    game_id: game.id,
                    game_name: Some(game.name),
                    game_url: Some(game.game_url),
                    valid: outcome.valid,
                    status: outcome.status,
                    error: outcome.error,
                });
            }
        }
    }

    let valid = results.iter().filter(|r| r.valid).count();
    let total = results.len();

    Ok(Json(json!({
        "success": true,
        "results": results,
        "summary": {
            "total": total,
            "valid": valid,
            "invalid": total - valid,
        },
    })))
}
