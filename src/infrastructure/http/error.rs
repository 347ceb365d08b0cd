//! HTTP Error Handling
//!
//! HTTP 状态码与 errno 保持一致

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: u16,
    pub error: String,
    pub data: Option<Value>,
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const FORBIDDEN: u16 = 403;
    pub const NOT_FOUND: u16 = 404;
    pub const CONFLICT: u16 = 409;
    pub const INTERNAL_ERROR: u16 = 500;
    pub const SERVICE_UNAVAILABLE: u16 = 503;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// 额度不足，附带 required / remaining
    QuotaExceeded { required: u64, remaining: u64 },
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
    ServiceUnavailable(String),
}

impl ApiError {
    fn errno(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) | ApiError::QuotaExceeded { .. } => errno::BAD_REQUEST,
            ApiError::Unauthorized(_) => errno::UNAUTHORIZED,
            ApiError::Forbidden(_) => errno::FORBIDDEN,
            ApiError::NotFound(_) => errno::NOT_FOUND,
            ApiError::Conflict(_) => errno::CONFLICT,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
            ApiError::ServiceUnavailable(_) => errno::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::QuotaExceeded { .. } => "Not enough characters remaining".to_string(),
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg)
            | ApiError::ServiceUnavailable(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let errno = self.errno();
        let error = self.message();

        match &self {
            ApiError::Internal(_) => {
                tracing::error!(errno, error = %error, "Internal server error")
            }
            ApiError::ServiceUnavailable(_) => {
                tracing::error!(errno, error = %error, "Service unavailable")
            }
            ApiError::NotFound(_) => tracing::warn!(errno, error = %error, "Resource not found"),
            ApiError::Conflict(_) => tracing::warn!(errno, error = %error, "Resource conflict"),
            _ => tracing::warn!(errno, error = %error, "Request rejected"),
        }

        let data = match self {
            ApiError::QuotaExceeded {
                required,
                remaining,
            } => Some(json!({ "required": required, "remaining": remaining })),
            _ => None,
        };

        let status = StatusCode::from_u16(errno).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse { errno, error, data })).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            ApplicationError::Forbidden(msg) => ApiError::Forbidden(msg),
            ApplicationError::Conflict(msg) => ApiError::Conflict(msg),
            ApplicationError::QuotaExceeded {
                required,
                remaining,
            } => ApiError::QuotaExceeded {
                required,
                remaining,
            },
            ApplicationError::NotConfigured(msg) => ApiError::ServiceUnavailable(msg),
            ApplicationError::RateLimited(_) | ApplicationError::ExternalServiceError(_) => {
                ApiError::ServiceUnavailable(e.to_string())
            }
            ApplicationError::RepositoryError(_)
            | ApplicationError::StorageError(_)
            | ApplicationError::InternalError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
