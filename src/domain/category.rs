//! Category records. Categories are append-only; there is no delete.

use serde::{Deserialize, Serialize};

/// Color assigned to categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#3B82F6";

/// A category row with the count of active games referencing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub created_at: String,
    pub game_count: i64,
}

/// Request body for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    pub color: Option<String>,
}
