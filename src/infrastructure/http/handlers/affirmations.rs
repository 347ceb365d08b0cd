//! Affirmation HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::handlers::{BatchUpdateResponse, UpdatedAffirmationResponse};
use crate::application::queries::handlers::{DefaultAffirmationItem, UserAffirmationItem};
use crate::application::{
    AffirmationUpdate, BatchUpdateAffirmations, CreateCustomAffirmation, DeleteCustomAffirmation,
    ListDefaultAffirmations, ListUserAffirmations, UpdateAffirmation,
};
use crate::infrastructure::http::dto::{ApiResponse, SuccessFlag};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::AuthUser;
use crate::infrastructure::http::state::AppState;

use super::parse_id;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAffirmationRequest {
    pub enabled: Option<bool>,
    pub order: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAffirmationRequest {
    pub category_id: Option<String>,
    #[serde(default)]
    pub text: String,
    pub order: Option<i64>,
}

/// 解析批量更新中的单项，类型不符的字段按缺失处理
fn parse_update(item: &Value) -> AffirmationUpdate {
    AffirmationUpdate {
        id: item
            .get("id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok()),
        enabled: item.get("enabled").and_then(Value::as_bool),
        order: item.get("order").and_then(Value::as_i64),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// 系统默认肯定语（公开）
pub async fn list_default_affirmations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<DefaultAffirmationItem>>>, ApiError> {
    let result = state
        .list_default_affirmations_handler
        .handle(ListDefaultAffirmations)
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 当前用户的合并列表
pub async fn list_user_affirmations(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<Vec<UserAffirmationItem>>>, ApiError> {
    let result = state
        .list_user_affirmations_handler
        .handle(ListUserAffirmations { user_id })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 更新单条肯定语的启用状态 / 顺序
pub async fn update_affirmation(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateAffirmationRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UpdatedAffirmationResponse>>, ApiError> {
    let id = parse_id(&id, "Affirmation")?;
    let Json(req) = body?;

    let result = state
        .update_affirmation_handler
        .handle(UpdateAffirmation {
            user_id,
            id,
            enabled: req.enabled,
            order: req.order,
        })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 批量更新
pub async fn batch_update_affirmations(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<BatchUpdateResponse>>, ApiError> {
    let Json(body) = body?;
    let items = body
        .as_array()
        .ok_or_else(|| ApiError::BadRequest("Expected array of updates".to_string()))?;

    let result = state
        .batch_update_affirmations_handler
        .handle(BatchUpdateAffirmations {
            user_id,
            updates: items.iter().map(parse_update).collect(),
        })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 创建自定义肯定语（高级订阅）
pub async fn create_affirmation(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<CreateAffirmationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UserAffirmationItem>>), ApiError> {
    let Json(req) = body?;
    let category_id = req
        .category_id
        .ok_or_else(|| ApiError::BadRequest("category_id is required".to_string()))?;
    let category_id = parse_id(&category_id, "Category")?;

    let result = state
        .create_custom_affirmation_handler
        .handle(CreateCustomAffirmation {
            user_id,
            category_id,
            text: req.text,
            order: req.order,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(result))))
}

/// 删除自定义肯定语（高级订阅）
pub async fn delete_affirmation(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SuccessFlag>>, ApiError> {
    let id = parse_id(&id, "Custom affirmation")?;

    state
        .delete_custom_affirmation_handler
        .handle(DeleteCustomAffirmation { user_id, id })
        .await?;
    Ok(Json(ApiResponse::ok()))
}
