//! Voice HTTP Handlers

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::application::queries::handlers::{
    ConfiguredVoiceResponse, ConfiguredVoicesResponse, GroupedVoicesResponse,
    RecommendedVoicesResponse, SubscriptionResponse, VoicePreviewResponse,
};
use crate::application::{
    GetDefaultVoice, GetSubscriptionInfo, GetVoicePreview, ListConfiguredVoices,
    ListProviderVoices, ListRecommendedVoices,
};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::AuthUser;
use crate::infrastructure::http::state::AppState;

/// 服务商音色（按类别分组）
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<GroupedVoicesResponse>>, ApiError> {
    let result = state
        .list_provider_voices_handler
        .handle(ListProviderVoices)
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 已配置音色（免费用户只能看到默认音色）
pub async fn list_configured_voices(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<ConfiguredVoicesResponse>>, ApiError> {
    let result = state
        .list_configured_voices_handler
        .handle(ListConfiguredVoices { user_id })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 默认音色（公开）
pub async fn default_voice(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ConfiguredVoiceResponse>>, ApiError> {
    let result = state.default_voice_handler.handle(GetDefaultVoice).await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 推荐音色
pub async fn recommended_voices(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<RecommendedVoicesResponse>>, ApiError> {
    let result = state
        .recommended_voices_handler
        .handle(ListRecommendedVoices)
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 服务商订阅额度
pub async fn subscription_info(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<SubscriptionResponse>>, ApiError> {
    let result = state
        .subscription_handler
        .handle(GetSubscriptionInfo)
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 音色试听地址
pub async fn voice_preview(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(voice_id): Path<String>,
) -> Result<Json<ApiResponse<VoicePreviewResponse>>, ApiError> {
    let result = state
        .voice_preview_handler
        .handle(GetVoicePreview { voice_id })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}
