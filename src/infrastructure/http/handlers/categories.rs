//! Category HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::queries::handlers::CategoryResponse;
use crate::application::ListCategories;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 分类列表（固定顺序）
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, ApiError> {
    let result = state.list_categories_handler.handle(ListCategories).await?;
    Ok(Json(ApiResponse::success(result)))
}
