//! Game operations: listing, CRUD, soft delete, and the slug probe loop.

use super::{GameListFilter, GameUpdate, NewGame, Repository};
use crate::domain::slug::base_slug;
use crate::domain::{Game, GameStatus};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;
use tracing::warn;

const GAME_SELECT: &str = "SELECT g.*, c.name AS category_name, c.color AS category_color \
     FROM games g LEFT JOIN categories c ON g.category_id = c.id";

impl Repository {
    /// List games with pagination, returning the page and the total
    /// count matching the filters.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_games(
        &self,
        filter: &GameListFilter,
    ) -> Result<(Vec<Game>, i64), sqlx::Error> {
        let mut clauses: Vec<&str> = Vec::new();
        if !filter.admin {
            clauses.push("g.is_active = 1");
            clauses.push("g.status = 'published'");
        }
        if filter.category_id.is_some() {
            clauses.push("g.category_id = ?");
        }
        if filter.search.is_some() {
            clauses.push("(g.name LIKE ? OR g.description LIKE ?)");
        }
        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        let search_pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        let select_sql = format!(
            "{}{} ORDER BY g.created_at DESC, g.id DESC LIMIT ? OFFSET ?",
            GAME_SELECT, where_sql
        );
        let mut query = sqlx::query(&select_sql);
        if let Some(category_id) = filter.category_id {
            query = query.bind(category_id);
        }
        if let Some(pattern) = &search_pattern {
            query = query.bind(pattern).bind(pattern);
        }
        let offset = i64::from(filter.page.saturating_sub(1)) * i64::from(filter.limit);
        let rows = query
            .bind(i64::from(filter.limit))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        let games = rows.iter().map(map_game_row).collect();

        let count_sql = format!("SELECT COUNT(*) AS total FROM games g{}", where_sql);
        let mut count_query = sqlx::query(&count_sql);
        if let Some(category_id) = filter.category_id {
            count_query = count_query.bind(category_id);
        }
        if let Some(pattern) = &search_pattern {
            count_query = count_query.bind(pattern).bind(pattern);
        }
        let total: i64 = count_query.fetch_one(&self.pool).await?.get("total");

        Ok((games, total))
    }

    /// Fetch a game by id, regardless of visibility. The handler
    /// decides whether the caller may see non-public records.
    pub async fn get_game(&self, id: i64) -> Result<Option<Game>, sqlx::Error> {
        let row = sqlx::query(&format!("{} WHERE g.id = ?", GAME_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_game_row))
    }

    /// Fetch a publicly visible game by its URL slug.
    pub async fn get_game_by_slug(&self, slug: &str) -> Result<Option<Game>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "{} WHERE g.url_slug = ? AND g.is_active = 1 AND g.status = 'published'",
            GAME_SELECT
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_game_row))
    }

    /// Insert a game and return its id.
    ///
    /// # Errors
    /// Returns an error if the insert fails (including unique-constraint
    /// violations on namespace/url_slug the caller failed to probe).
    pub async fn insert_game(&self, game: &NewGame) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO games
            (name, description, game_url, thumbnail_url, category_id, namespace, url_slug,
             size_width, size_height, rating, platform, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&game.name)
        .bind(&game.description)
        .bind(&game.game_url)
        .bind(&game.thumbnail_url)
        .bind(game.category_id)
        .bind(&game.namespace)
        .bind(&game.url_slug)
        .bind(game.size_width)
        .bind(game.size_height)
        .bind(game.rating)
        .bind(&game.platform)
        .bind(game.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Update a game in place, bumping `updated_at`. Returns false when
    /// no row has that id.
    pub async fn update_game(&self, id: i64, update: &GameUpdate) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE games
            SET name = ?, description = ?, game_url = ?, thumbnail_url = ?,
                category_id = ?, url_slug = ?, size_width = ?, size_height = ?,
                rating = ?, platform = ?, status = COALESCE(?, status),
                updated_at = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.game_url)
        .bind(&update.thumbnail_url)
        .bind(update.category_id)
        .bind(&update.url_slug)
        .bind(update.size_width)
        .bind(update.size_height)
        .bind(update.rating)
        .bind(&update.platform)
        .bind(update.status.map(|s| s.as_str()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a game by flipping is_active. Returns false when no
    /// row has that id.
    pub async fn soft_delete_game(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE games SET is_active = 0, updated_at = datetime('now') WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Probe whether a slug is taken, optionally ignoring one record's
    /// own id (self-exclusion during updates).
    pub async fn slug_in_use(
        &self,
        slug: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let row = match exclude_id {
            Some(id) => {
                sqlx::query("SELECT id FROM games WHERE url_slug = ? AND id != ?")
                    .bind(slug)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT id FROM games WHERE url_slug = ?")
                    .bind(slug)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        Ok(row.is_some())
    }

    /// Probe whether a namespace is taken.
    pub async fn namespace_in_use(&self, namespace: &str) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT id FROM games WHERE namespace = ?")
            .bind(namespace)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Produce a slug for `name` that is unique among current games.
    ///
    /// Starts from the normalized base slug and appends `-2`, `-3`, ...
    /// until the probe finds no collision. With `exclude_id` set, a
    /// record re-slugged against its own stored slug gets it back
    /// unchanged.
    pub async fn generate_unique_slug(
        &self,
        name: &str,
        exclude_id: Option<i64>,
    ) -> Result<String, sqlx::Error> {
        let base = base_slug(name, Utc::now().timestamp_millis());
        let mut candidate = base.clone();
        let mut counter = 1u32;

        loop {
            if !self.slug_in_use(&candidate, exclude_id).await? {
                return Ok(candidate);
            }
            counter += 1;
            candidate = format!("{}-{}", base, counter);
        }
    }
}

fn map_game_row(row: &SqliteRow) -> Game {
    let status_str: String = row.get("status");
    let status = GameStatus::from_str(&status_str).unwrap_or_else(|e| {
        warn!(error = %e, "Unexpected status in games table, treating as published");
        GameStatus::Published
    });
    let is_active: i64 = row.get("is_active");

    Game {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        game_url: row.get("game_url"),
        thumbnail_url: row.get("thumbnail_url"),
        category_id: row.get("category_id"),
        namespace: row.get("namespace"),
        url_slug: row.get("url_slug"),
        size_width: row.get("size_width"),
        size_height: row.get("size_height"),
        rating: row.get("rating"),
        platform: row.get("platform"),
        status,
        is_active: is_active != 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        category_name: row.get("category_name"),
        category_color: row.get("category_color"),
    }
}
