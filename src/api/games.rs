//! Game endpoints: gated public listing, CRUD, and slug lookup.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{require_admin, AppState};
use crate::db::{GameListFilter, GameUpdate, NewGame};
use crate::domain::game::{
    generate_namespace, DEFAULT_HEIGHT, DEFAULT_PLATFORM, DEFAULT_WIDTH,
};
use crate::domain::{Game, GamePayload, GameStatus};
use crate::error::AppError;
use crate::gate::{self, HeuristicVerdict, RateDecision};
use crate::session;

const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<i64>,
    pub search: Option<String>,
    pub admin: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub games: Vec<Game>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

/// GET /api/games
///
/// Public listing, behind the rate limiter and the origin/agent
/// heuristics. `admin=true` with a valid session skips the heuristics
/// and lifts the visibility filters; the rate limit applies to
/// everyone.
pub async fn list_games(
    Query(params): Query<ListQuery>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListResponse>, AppError> {
    let now_ms = Utc::now().timestamp_millis();
    let client = gate::client_key(&headers);

    if let RateDecision::Blocked { retry_after_ms } = state.rate_limiter.check(&client, now_ms) {
        warn!(client = %client, retry_after_ms, "listing request rate limited");
        return Err(AppError::RateLimited(format!(
            "too many requests, retry in {}s",
            (retry_after_ms + 999) / 1000
        )));
    }

    let admin = if params.admin.unwrap_or(false) {
        if !session::has_valid_session(&headers, &state.config.admin_password, now_ms) {
            return Err(AppError::Unauthorized("admin session required".to_string()));
        }
        true
    } else {
        let verdict = gate::heuristics::evaluate(&headers);
        if verdict != HeuristicVerdict::Allowed {
            warn!(client = %client, verdict = %verdict, "listing request rejected by heuristics");
            return Err(AppError::Forbidden(verdict.to_string()));
        }
        false
    };

    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let filter = GameListFilter {
        page,
        limit,
        category_id: params.category,
        search: params.search.filter(|s| !s.is_empty()),
        admin,
    };

    let (games, total) = state.repo.list_games(&filter).await?;
    let total_pages = (total + i64::from(limit) - 1) / i64::from(limit);

    Ok(Json(ListResponse {
        games,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages,
        },
    }))
}

/// POST /api/games (admin)
pub async fn create_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<GamePayload>,
) -> Result<Json<Value>, AppError> {
    require_admin(&headers, &state.config)?;
    validate_payload(&payload)?;

    let namespace = match payload.namespace.as_deref() {
        Some(ns) if !ns.is_empty() => {
            if state.repo.namespace_in_use(ns).await? {
                return Err(AppError::BadRequest(format!(
                    "namespace '{}' already in use",
                    ns
                )));
            }
            ns.to_string()
        }
        _ => generate_namespace(),
    };

    let url_slug = match payload.url_slug.as_deref() {
        Some(slug) if !slug.trim().is_empty() => {
            state.repo.generate_unique_slug(slug, None).await?
        }
        _ => state.repo.generate_unique_slug(&payload.name, None).await?,
    };

    let new_game = NewGame {
        name: payload.name,
        description: payload.description,
        game_url: payload.game_url,
        thumbnail_url: payload.thumbnail_url,
        category_id: payload.category_id,
        namespace,
        url_slug: url_slug.clone(),
        size_width: payload.size_width.unwrap_or(DEFAULT_WIDTH),
        size_height: payload.size_height.unwrap_or(DEFAULT_HEIGHT),
        rating: payload.rating.unwrap_or(0.0),
        platform: payload
            .platform
            .unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
        status: payload.status.unwrap_or(GameStatus::Published),
    };

    let id = state.repo.insert_game(&new_game).await?;
    info!(id, slug = %url_slug, "game created");

    Ok(Json(json!({
        "success": true,
        "id": id,
        "url_slug": url_slug,
        "message": "Game created successfully",
    })))
}

/// GET /api/games/:id
///
/// Publicly visible games are served to anyone; drafts, archived, and
/// soft-deleted records require an admin session and are a 404 to
/// everyone else.
pub async fn get_game(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Game>, AppError> {
    let game = state
        .repo
        .get_game(id)
        .await?
        .ok_or_else(|| AppError::NotFound("game not found".to_string()))?;

    if !game.publicly_visible() {
        let now_ms = Utc::now().timestamp_millis();
        if !session::has_valid_session(&headers, &state.config.admin_password, now_ms) {
            // hide the record's existence from non-admins
            return Err(AppError::NotFound("game not found".to_string()));
        }
    }

    Ok(Json(game))
}

/// GET /api/games/by-slug/:slug
pub async fn get_game_by_slug(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Game>, AppError> {
    let game = state
        .repo
        .get_game_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("game not found".to_string()))?;
    Ok(Json(game))
}

/// PUT /api/games/:id (admin)
///
/// Re-slugs on every update: an explicit url_slug is uniquified with
/// the record itself excluded, otherwise the slug is regenerated from
/// the name. Namespace is immutable.
pub async fn update_game(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<GamePayload>,
) -> Result<Json<Value>, AppError> {
    require_admin(&headers, &state.config)?;
    validate_payload(&payload)?;

    let url_slug = match payload.url_slug.as_deref() {
        Some(slug) if !slug.trim().is_empty() => {
            state.repo.generate_unique_slug(slug, Some(id)).await?
        }
        _ => {
            state
                .repo
                .generate_unique_slug(&payload.name, Some(id))
                .await?
        }
    };

    let update = GameUpdate {
        name: payload.name,
        description: payload.description,
        game_url: payload.game_url,
        thumbnail_url: payload.thumbnail_url,
        category_id: payload.category_id,
        url_slug: url_slug.clone(),
        size_width: payload.size_width.unwrap_or(DEFAULT_WIDTH),
        size_height: payload.size_height.unwrap_or(DEFAULT_HEIGHT),
        rating: payload.rating.unwrap_or(0.0),
        platform: payload
            .platform
            .unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
        status: payload.status,
    };

    if !state.repo.update_game(id, &update).await? {
        return Err(AppError::NotFound("game not found".to_string()));
    }
    info!(id, slug = %url_slug, "game updated");

    Ok(Json(json!({
        "success": true,
        "url_slug": url_slug,
        "message": "Game updated successfully",
    })))
}

/// DELETE /api/games/:id (admin, soft delete)
pub async fn delete_game(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    require_admin(&headers, &state.config)?;

    if !state.repo.soft_delete_game(id).await? {
        return Err(AppError::NotFound("game not found".to_string()));
    }
    info!(id, "game soft-deleted");

    Ok(Json(json!({
        "success": true,
        "message": "Game deleted successfully",
    })))
}

fn validate_payload(payload: &GamePayload) -> Result<(), AppError> {
    if payload.name.trim().is_empty() || payload.game_url.trim().is_empty() {
        return Err(AppError::BadRequest(
            "name and game_url are required".to_string(),
        ));
    }
    Ok(())
}
