//! CSV bulk import endpoint and the matching template download.

use axum::extract::{Multipart, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use super::{require_admin, AppState};
use crate::error::AppError;
use crate::importer;

/// GET /api/games/import — downloadable CSV template.
pub async fn download_template() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/csv"),
            (
                CONTENT_DISPOSITION,
                "attachment; filename=\"games_template.csv\"",
            ),
        ],
        importer::CSV_TEMPLATE,
    )
}

/// POST /api/games/import (admin) — multipart upload, `file` field.
pub async fn import_games(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    require_admin(&headers, &state.config)?;

    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());
        let looks_like_csv = file_name
            .as_deref()
            .map(|n| n.ends_with(".csv"))
            .unwrap_or(false)
            || content_type
                .as_deref()
                .map(|t| t.contains("csv"))
                .unwrap_or(false);
        if !looks_like_csv {
            return Err(AppError::BadRequest(
                "please upload a CSV file".to_string(),
            ));
        }

        data = Some(
            field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("failed to read upload: {}", e)))?,
        );
        break;
    }

    let data = data.ok_or_else(|| AppError::BadRequest("no file provided".to_string()))?;

    let outcome = importer::import_csv(&state.repo, &data).await;
    info!(
        success = outcome.success,
        failed = outcome.failed,
        "CSV import completed"
    );

    Ok(Json(json!({
        "message": format!(
            "Import completed: {} successful, {} failed",
            outcome.success, outcome.failed
        ),
        "results": outcome,
    })))
}
