pub mod auth;
pub mod categories;
pub mod check;
pub mod games;
pub mod health;
pub mod import;

use crate::config::Config;
use crate::db::Repository;
use crate::error::AppError;
use crate::gate::rate_limit::RateLimiter;
use crate::session;
use crate::urlcheck::UrlChecker;
use axum::http::HeaderMap;
use axum::{
    routing::{get, post},
    Router,
};
use chrono::Utc;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
    pub rate_limiter: Arc<RateLimiter>,
    pub url_checker: Arc<dyn UrlChecker>,
}

impl AppState {
    pub fn new(
        repo: Arc<Repository>,
        config: Config,
        url_checker: Arc<dyn UrlChecker>,
    ) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit()));
        Self {
            repo,
            config,
            rate_limiter,
            url_checker,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/api/games",
            get(games::list_games).post(games::create_game),
        )
        .route(
            "/api/games/import",
            get(import::download_template).post(import::import_games),
        )
        .route(
            "/api/games/check",
            get(check::check_url).post(check::check_games),
        )
        .route("/api/games/by-slug/:slug", get(games::get_game_by_slug))
        .route(
            "/api/games/:id",
            get(games::get_game)
                .put(games::update_game)
                .delete(games::delete_game),
        )
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/check", get(auth::check))
        .layer(cors)
        .with_state(state)
}

/// Reject the request unless it carries a valid admin session cookie.
pub(crate) fn require_admin(headers: &HeaderMap, config: &Config) -> Result<(), AppError> {
    let now_ms = Utc::now().timestamp_millis();
    if session::has_valid_session(headers, &config.admin_password, now_ms) {
        Ok(())
    } else {
        Err(AppError::Unauthorized("admin session required".to_string()))
    }
}
