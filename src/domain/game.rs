//! Game records, publication status, and request payloads.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Default embed size when the caller does not provide one.
pub const DEFAULT_WIDTH: i64 = 800;
pub const DEFAULT_HEIGHT: i64 = 600;
/// Default platform label for games imported without one.
pub const DEFAULT_PLATFORM: &str = "unknown";

/// Publication state of a game.
///
/// Only `Published` games appear in public listings; drafts and
/// archived games are visible to admin sessions only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Published,
    Draft,
    Archived,
}

#[derive(Debug, Error)]
#[error("invalid game status: {0}")]
pub struct ParseGameStatusError(pub String);

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Published => "published",
            GameStatus::Draft => "draft",
            GameStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for GameStatus {
    type Err = ParseGameStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "published" => Ok(GameStatus::Published),
            "draft" => Ok(GameStatus::Draft),
            "archived" => Ok(GameStatus::Archived),
            other => Err(ParseGameStatusError(other.to_string())),
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A game row as returned to API clients, joined with its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub game_url: String,
    pub thumbnail_url: Option<String>,
    pub category_id: Option<i64>,
    pub namespace: Option<String>,
    pub url_slug: Option<String>,
    pub size_width: i64,
    pub size_height: i64,
    pub rating: f64,
    pub platform: String,
    pub status: GameStatus,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_color: Option<String>,
}

impl Game {
    /// Whether the record is visible without an admin session.
    pub fn publicly_visible(&self) -> bool {
        self.is_active && self.status == GameStatus::Published
    }
}

/// Request body for creating or updating a game.
#[derive(Debug, Clone, Deserialize)]
pub struct GamePayload {
    pub name: String,
    pub description: Option<String>,
    pub game_url: String,
    pub thumbnail_url: Option<String>,
    pub category_id: Option<i64>,
    pub namespace: Option<String>,
    pub url_slug: Option<String>,
    pub size_width: Option<i64>,
    pub size_height: Option<i64>,
    pub rating: Option<f64>,
    pub platform: Option<String>,
    pub status: Option<GameStatus>,
}

/// Generate a fresh namespace for a game created without one.
///
/// Namespaces predate slugs as the unique identifier; generated ones
/// embed the creation time and a random suffix so they never collide.
pub fn generate_namespace() -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("game-{}-{}", Utc::now().timestamp_millis(), suffix)
}
