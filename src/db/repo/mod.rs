//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database
//! operations. Methods are organized across submodules by domain:
//! - `games.rs` - game CRUD, listing filters, slug/namespace probes
//! - `categories.rs` - category listing and find-or-create

mod categories;
mod games;

use crate::domain::GameStatus;
use sqlx::sqlite::SqlitePool;

/// Filters for the games listing endpoint.
#[derive(Debug, Clone)]
pub struct GameListFilter {
    /// 1-based page number.
    pub page: u32,
    /// Page size, already capped by the handler.
    pub limit: u32,
    pub category_id: Option<i64>,
    /// Substring match against name and description.
    pub search: Option<String>,
    /// Admin scope drops the is_active/status visibility filters.
    pub admin: bool,
}

/// Column values for inserting a game. Slug and namespace are already
/// uniquified by the caller.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub name: String,
    pub description: Option<String>,
    pub game_url: String,
    pub thumbnail_url: Option<String>,
    pub category_id: Option<i64>,
    pub namespace: String,
    pub url_slug: String,
    pub size_width: i64,
    pub size_height: i64,
    pub rating: f64,
    pub platform: String,
    pub status: GameStatus,
}

/// Column values for updating a game. `status: None` leaves the stored
/// status untouched; namespace is immutable after creation.
#[derive(Debug, Clone)]
pub struct GameUpdate {
    pub name: String,
    pub description: Option<String>,
    pub game_url: String,
    pub thumbnail_url: Option<String>,
    pub category_id: Option<i64>,
    pub url_slug: String,
    pub size_width: i64,
    pub size_height: i64,
    pub rating: f64,
    pub platform: String,
    pub status: Option<GameStatus>,
}

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Round-trip a trivial query, for readiness probes.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
