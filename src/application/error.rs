//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{AuthError, RepositoryError, StorageError, TtsError};
use crate::domain::{AccountError, AffirmationError, AudioError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("{0}")]
    ValidationError(String),

    /// 未认证或凭据无效
    #[error("{0}")]
    Unauthorized(String),

    /// 权限不足（需要高级订阅）
    #[error("{0}")]
    Forbidden(String),

    /// 资源冲突
    #[error("{0}")]
    Conflict(String),

    /// 服务商额度不足
    #[error("Not enough characters remaining")]
    QuotaExceeded { required: u64, remaining: u64 },

    /// 外部服务未配置
    #[error("{0}")]
    NotConfigured(String),

    /// 服务商限流
    #[error("Rate limited by TTS provider: {0}")]
    RateLimited(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn premium_required() -> Self {
        Self::Forbidden("Premium subscription required".to_string())
    }

    pub fn not_configured() -> Self {
        Self::NotConfigured("ElevenLabs not configured".to_string())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(msg) => Self::Conflict(msg),
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<TtsError> for ApplicationError {
    fn from(err: TtsError) -> Self {
        match err {
            TtsError::NotConfigured => Self::not_configured(),
            TtsError::VoiceNotFound(id) => Self::not_found("Voice", id),
            TtsError::RateLimited(msg) => Self::RateLimited(msg),
            other => Self::ExternalServiceError(other.to_string()),
        }
    }
}

impl From<StorageError> for ApplicationError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::FileNotFound(path) => Self::not_found("Audio file", path),
            StorageError::InvalidPath(path) => Self::not_found("Audio file", path),
            other => Self::StorageError(other.to_string()),
        }
    }
}

impl From<AuthError> for ApplicationError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::HashError(msg) => Self::InternalError(msg),
            other => Self::Unauthorized(other.to_string()),
        }
    }
}

impl From<AccountError> for ApplicationError {
    fn from(err: AccountError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<AffirmationError> for ApplicationError {
    fn from(err: AffirmationError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<AudioError> for ApplicationError {
    fn from(err: AudioError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err: ApplicationError = RepositoryError::Duplicate("email".into()).into();
        assert!(matches!(err, ApplicationError::Conflict(_)));
    }

    #[test]
    fn test_tts_not_configured_maps_to_not_configured() {
        let err: ApplicationError = TtsError::NotConfigured.into();
        assert!(matches!(err, ApplicationError::NotConfigured(_)));

        let err: ApplicationError = TtsError::Timeout.into();
        assert!(matches!(err, ApplicationError::ExternalServiceError(_)));

        let err: ApplicationError = TtsError::RateLimited("slow down".into()).into();
        assert!(matches!(err, ApplicationError::RateLimited(_)));
    }

    #[test]
    fn test_auth_errors_map_to_unauthorized() {
        let err: ApplicationError = AuthError::Expired.into();
        assert!(matches!(err, ApplicationError::Unauthorized(_)));

        let err: ApplicationError = AuthError::HashError("boom".into()).into();
        assert!(matches!(err, ApplicationError::InternalError(_)));
    }
}
