//! User Config HTTP Handlers

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::application::queries::handlers::UserConfigResponse;
use crate::application::{GetUserConfig, UpdateUserConfig};
use crate::domain::UserPreferencesPatch;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::AuthUser;
use crate::infrastructure::http::state::AppState;

/// 读取播放配置
pub async fn get_config(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<UserConfigResponse>>, ApiError> {
    let result = state
        .get_config_handler
        .handle(GetUserConfig { user_id })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 部分更新播放配置
pub async fn update_config(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<UserPreferencesPatch>, JsonRejection>,
) -> Result<Json<ApiResponse<UserConfigResponse>>, ApiError> {
    let Json(patch) = body?;

    let result = state
        .update_config_handler
        .handle(UpdateUserConfig { user_id, patch })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}
