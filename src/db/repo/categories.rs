//! Category operations. Categories are append-only; nothing deletes them.

use super::Repository;
use crate::domain::{Category, DEFAULT_CATEGORY_COLOR};
use sqlx::Row;

impl Repository {
    /// List all categories, each with its count of active games.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.name, c.color, c.created_at, COUNT(g.id) AS game_count
            FROM categories c
            LEFT JOIN games g ON c.id = g.category_id AND g.is_active = 1
            GROUP BY c.id
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let categories = rows
            .iter()
            .map(|row| Category {
                id: row.get("id"),
                name: row.get("name"),
                color: row.get("color"),
                created_at: row.get("created_at"),
                game_count: row.get("game_count"),
            })
            .collect();

        Ok(categories)
    }

    /// Insert a category and return its id.
    ///
    /// # Errors
    /// Returns an error if the insert fails (including the unique
    /// constraint on name).
    pub async fn insert_category(&self, name: &str, color: &str) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO categories (name, color) VALUES (?, ?)")
            .bind(name)
            .bind(color)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Look up a category id by name, case-insensitively.
    pub async fn find_category_by_name(&self, name: &str) -> Result<Option<i64>, sqlx::Error> {
        let row = sqlx::query("SELECT id FROM categories WHERE name = ? COLLATE NOCASE")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("id")))
    }

    /// Resolve a category by name, creating it with the default color
    /// when it does not exist yet. Used by the CSV importer.
    pub async fn find_or_create_category(&self, name: &str) -> Result<i64, sqlx::Error> {
        if let Some(id) = self.find_category_by_name(name).await? {
            return Ok(id);
        }
        self.insert_category(name, DEFAULT_CATEGORY_COLOR).await
    }
}
