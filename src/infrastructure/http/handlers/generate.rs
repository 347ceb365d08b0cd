//! Generate HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::application::commands::handlers::{BatchGenerateResponse, GenerateAudioResponse};
use crate::application::queries::handlers::UsageEstimateResponse;
use crate::application::{
    BatchGenerate, EstimateUsage, GenerateAffirmationAudio, PreviewSpeech,
};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::AuthUser;
use crate::infrastructure::http::state::AppState;

use super::parse_id;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub voice_id: Option<String>,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewRequest {
    pub text: Option<String>,
    pub voice_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BatchGenerateRequest {
    #[serde(default)]
    pub affirmation_ids: Vec<Value>,
    pub voice_id: Option<String>,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    pub affirmation_ids: Vec<Value>,
    pub voice_id: Option<String>,
}

/// ID 列表按原样交给应用层，非字符串项同样作为未知 ID 跳过
fn raw_ids(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect()
}

// ============================================================================
// Handlers
// ============================================================================

/// 生成单条肯定语音频（高级订阅）
pub async fn generate_affirmation(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<GenerateAudioResponse>>, ApiError> {
    let affirmation_id = parse_id(&id, "Affirmation")?;
    let Json(req) = body?;

    let result = state
        .generate_audio_handler
        .handle(GenerateAffirmationAudio {
            user_id,
            affirmation_id,
            voice_id: req.voice_id,
            force: req.force,
        })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 试听（直接返回音频，不保存）
pub async fn preview(
    State(state): State<Arc<AppState>>,
    AuthUser(_user_id): AuthUser,
    body: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;

    let speech = state
        .preview_speech_handler
        .handle(PreviewSpeech {
            text: req.text,
            voice_id: req.voice_id,
        })
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "inline; filename=preview.mp3".to_string(),
            ),
        ],
        speech.audio_data,
    )
        .into_response())
}

/// 批量生成（高级订阅）
pub async fn batch_generate(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<BatchGenerateRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BatchGenerateResponse>>, ApiError> {
    let Json(req) = body?;

    let result = state
        .batch_generate_handler
        .handle(BatchGenerate {
            user_id,
            affirmation_ids: raw_ids(req.affirmation_ids),
            voice_id: req.voice_id,
            force: req.force,
        })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 估算字符用量
pub async fn estimate(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<EstimateRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UsageEstimateResponse>>, ApiError> {
    let Json(req) = body?;

    let result = state
        .estimate_usage_handler
        .handle(EstimateUsage {
            user_id,
            affirmation_ids: raw_ids(req.affirmation_ids),
            voice_id: req.voice_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}
