//! CSV bulk import of games.
//!
//! Rows are processed independently: a bad row is recorded as a
//! failure with its line number and the batch keeps going. Categories
//! are matched by name (case-insensitive) or created on the fly.

use crate::db::{NewGame, Repository};
use crate::domain::game::{generate_namespace, DEFAULT_HEIGHT, DEFAULT_PLATFORM, DEFAULT_WIDTH};
use crate::domain::GameStatus;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Downloadable template matching the columns the importer reads.
pub const CSV_TEMPLATE: &str = "\
name,description,game_url,thumbnail_url,category,namespace,size_width,size_height,rating,platform
\"Example Game\",\"A sample entry\",\"https://example.com/game\",\"https://example.com/thumb.jpg\",\"Puzzle\",\"example-game\",800,600,4.5,\"Steam\"
\"Another Game\",\"Another sample\",\"https://example.com/game2\",\"\",\"Action\",\"\",600,400,3.2,\"Web\"
";

/// One row of the import CSV. Everything is read as a string and
/// coerced afterwards so a malformed number degrades to the default
/// instead of failing the row.
#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    game_url: String,
    #[serde(default)]
    thumbnail_url: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    namespace: String,
    #[serde(default)]
    size_width: String,
    #[serde(default)]
    size_height: String,
    #[serde(default)]
    rating: String,
    #[serde(default)]
    platform: String,
}

/// Per-batch import report.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub success: u32,
    pub failed: u32,
    pub errors: Vec<String>,
}

/// Import a CSV payload. Never aborts the batch: every failure is
/// reported against its source line (line 1 is the header, so data
/// rows start at 2).
pub async fn import_csv(repo: &Repository, data: &[u8]) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    for (index, record) in reader.deserialize::<ImportRow>().enumerate() {
        let line = index + 2;
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                outcome.failed += 1;
                outcome.errors.push(format!("Row {}: {}", line, e));
                continue;
            }
        };

        match import_row(repo, &row).await {
            Ok(()) => outcome.success += 1,
            Err(message) => {
                warn!(line, %message, "CSV import row failed");
                outcome.failed += 1;
                outcome.errors.push(format!("Row {}: {}", line, message));
            }
        }
    }

    outcome
}

async fn import_row(repo: &Repository, row: &ImportRow) -> Result<(), String> {
    if row.name.is_empty() || row.game_url.is_empty() {
        return Err("missing required fields (name, game_url)".to_string());
    }

    let category_id = if row.category.is_empty() {
        None
    } else {
        let id = repo
            .find_or_create_category(&row.category)
            .await
            .map_err(|e| e.to_string())?;
        Some(id)
    };

    let namespace = if row.namespace.is_empty() {
        generate_namespace()
    } else {
        if repo
            .namespace_in_use(&row.namespace)
            .await
            .map_err(|e| e.to_string())?
        {
            return Err(format!("namespace '{}' already in use", row.namespace));
        }
        row.namespace.clone()
    };

    let url_slug = repo
        .generate_unique_slug(&row.name, None)
        .await
        .map_err(|e| e.to_string())?;

    let game = NewGame {
        name: row.name.clone(),
        description: none_if_empty(&row.description),
        game_url: row.game_url.clone(),
        thumbnail_url: none_if_empty(&row.thumbnail_url),
        category_id,
        namespace,
        url_slug,
        size_width: row.size_width.parse().unwrap_or(DEFAULT_WIDTH),
        size_height: row.size_height.parse().unwrap_or(DEFAULT_HEIGHT),
        rating: row.rating.parse().unwrap_or(0.0),
        platform: if row.platform.is_empty() {
            DEFAULT_PLATFORM.to_string()
        } else {
            row.platform.clone()
        },
        status: GameStatus::Published,
    };

    repo.insert_game(&game).await.map_err(|e| e.to_string())?;
    Ok(())
}

fn none_if_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::init_db;
    use tempfile::TempDir;

    async fn setup_test_db() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_import_valid_rows() {
        let (repo, _temp) = setup_test_db().await;

        let csv = "name,description,game_url,thumbnail_url,category,namespace,size_width,size_height,rating,platform\n\
                   Snake,Classic snake,https://example.com/snake,,Puzzle,,640,480,4.2,Web\n\
                   Pinball,,https://example.com/pinball,,,,,,,\n";
        let outcome = import_csv(&repo, csv.as_bytes()).await;

        assert_eq!(outcome.success, 2);
        assert_eq!(outcome.failed, 0);
        assert!(outcome.errors.is_empty());

        let game = repo
            .get_game_by_slug("snake")
            .await
            .unwrap()
            .expect("snake missing");
        assert_eq!(game.size_width, 640);
        assert_eq!(game.rating, 4.2);
        assert_eq!(game.category_name.as_deref(), Some("Puzzle"));
        assert!(game.namespace.is_some());

        // defaults applied to the sparse row
        let pinball = repo
            .get_game_by_slug("pinball")
            .await
            .unwrap()
            .expect("pinball missing");
        assert_eq!(pinball.size_width, DEFAULT_WIDTH);
        assert_eq!(pinball.platform, DEFAULT_PLATFORM);
    }

    #[tokio::test]
    async fn test_import_reports_bad_rows_and_continues() {
        let (repo, _temp) = setup_test_db().await;

        let csv = "name,description,game_url,thumbnail_url,category,namespace,size_width,size_height,rating,platform\n\
                   Snake,,https://example.com/snake,,,,,,,\n\
                   ,,https://example.com/orphan,,,,,,,\n\
                   Pinball,,,,,,,,,\n\
                   Breakout,,https://example.com/breakout,,,,,,,\n";
        let outcome = import_csv(&repo, csv.as_bytes()).await;

        assert_eq!(outcome.success, 2);
        assert_eq!(outcome.failed, 2);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors[0].starts_with("Row 3:"));
        assert!(outcome.errors[1].starts_with("Row 4:"));
    }

    #[tokio::test]
    async fn test_import_auto_creates_category_once() {
        let (repo, _temp) = setup_test_db().await;

        let csv = "name,description,game_url,thumbnail_url,category,namespace,size_width,size_height,rating,platform\n\
                   A Game,,https://example.com/a,,Roguelike,,,,,\n\
                   B Game,,https://example.com/b,,roguelike,,,,,\n";
        let outcome = import_csv(&repo, csv.as_bytes()).await;
        assert_eq!(outcome.success, 2);

        let categories = repo.list_categories().await.unwrap();
        let roguelikes: Vec<_> = categories
            .iter()
            .filter(|c| c.name.eq_ignore_ascii_case("roguelike"))
            .collect();
        assert_eq!(roguelikes.len(), 1);
        assert_eq!(roguelikes[0].game_count, 2);
    }

    #[tokio::test]
    async fn test_import_duplicate_namespace_fails_row() {
        let (repo, _temp) = setup_test_db().await;

        let csv = "name,description,game_url,thumbnail_url,category,namespace,size_width,size_height,rating,platform\n\
                   Snake,,https://example.com/snake,,,shared-ns,,,,\n\
                   Clone,,https://example.com/clone,,,shared-ns,,,,\n";
        let outcome = import_csv(&repo, csv.as_bytes()).await;

        assert_eq!(outcome.success, 1);
        assert_eq!(outcome.failed, 1);
        assert!(outcome.errors[0].contains("namespace"));
    }

    #[tokio::test]
    async fn test_import_colliding_names_get_suffixed_slugs() {
        let (repo, _temp) = setup_test_db().await;

        let csv = "name,description,game_url,thumbnail_url,category,namespace,size_width,size_height,rating,platform\n\
                   Snake,,https://example.com/one,,,,,,,\n\
                   Snake,,https://example.com/two,,,,,,,\n";
        let outcome = import_csv(&repo, csv.as_bytes()).await;
        assert_eq!(outcome.success, 2);

        assert!(repo.get_game_by_slug("snake").await.unwrap().is_some());
        assert!(repo.get_game_by_slug("snake-2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_template_parses_cleanly() {
        let (repo, _temp) = setup_test_db().await;

        let outcome = import_csv(&repo, CSV_TEMPLATE.as_bytes()).await;
        assert_eq!(outcome.success, 2);
        assert_eq!(outcome.failed, 0);
    }
}
