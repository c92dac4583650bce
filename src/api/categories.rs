//! Category endpoints. Listing is public; creation needs an admin session.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use super::{require_admin, AppState};
use crate::domain::{Category, CategoryPayload, DEFAULT_CATEGORY_COLOR};
use crate::error::AppError;

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = state.repo.list_categories().await?;
    Ok(Json(categories))
}

/// POST /api/categories (admin)
pub async fn create_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Value>, AppError> {
    require_admin(&headers, &state.config)?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if state.repo.find_category_by_name(name).await?.is_some() {
        return Err(AppError::BadRequest(format!(
            "category '{}' already exists",
            name
        )));
    }

    let color = payload
        .color
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string());
    let id = state.repo.insert_category(name, &color).await?;
    info!(id, name, "category created");

    Ok(Json(json!({
        "success": true,
        "id": id,
        "message": "Category created successfully",
    })))
}
