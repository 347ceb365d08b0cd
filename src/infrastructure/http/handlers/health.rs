//! Health Handler

use axum::Json;
use serde::Serialize;

/// 健康检查响应（固定格式，不使用统一响应包装）
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// 健康检查
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
