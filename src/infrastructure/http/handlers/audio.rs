//! Audio HTTP Handlers
//!
//! 文件下载（流式）、录音上传、解除关联

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::application::commands::handlers::{DeleteAudioResponse, UploadAudioResponse};
use crate::application::{DeleteAudio, GetAudioFile, UploadAudio};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::AuthUser;
use crate::infrastructure::http::state::AppState;

use super::parse_id;

const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";

/// 下载存储中的音频文件
pub async fn serve_audio_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let result = state
        .audio_file_handler
        .handle(GetAudioFile { path })
        .await?;

    let file = tokio::fs::File::open(&result.file_path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to open audio file: {}", e)))?;
    let file_size = file
        .metadata()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to get file metadata: {}", e)))?
        .len();

    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.content_type)
        .header(header::CONTENT_LENGTH, file_size)
        .header(header::CACHE_CONTROL, IMMUTABLE_CACHE)
        .body(body)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// 上传录音（高级订阅）
pub async fn upload_audio(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(affirmation_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadAudioResponse>>, ApiError> {
    let affirmation_id = parse_id(&affirmation_id, "Affirmation")?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut duration_ms: Option<u64> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;
                file = Some((filename, data.to_vec()));
            }
            "duration_ms" => {
                let text = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read duration_ms: {}", e))
                })?;
                // 客户端可能上报浮点毫秒
                duration_ms = text
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|d| d.is_finite() && *d > 0.0)
                    .map(|d| d.round() as u64);
            }
            _ => {}
        }
    }

    let (filename, data) =
        file.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;
    if filename.is_empty() {
        return Err(ApiError::BadRequest("No file selected".to_string()));
    }

    let result = state
        .upload_audio_handler
        .handle(UploadAudio {
            user_id,
            affirmation_id,
            filename,
            data,
            duration_ms,
        })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// 解除音频关联
pub async fn delete_audio(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(affirmation_id): Path<String>,
) -> Result<Json<ApiResponse<DeleteAudioResponse>>, ApiError> {
    // 无效 ID 上没有可解除的音频
    let Ok(affirmation_id) = Uuid::parse_str(affirmation_id.trim()) else {
        return Ok(Json(ApiResponse::success(DeleteAudioResponse { success: true })));
    };

    let result = state
        .delete_audio_handler
        .handle(DeleteAudio {
            user_id,
            affirmation_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(result)))
}
