//! 访问控制 - 用户与订阅计划校验

use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{TtsEnginePort, UserRecord, UserRepositoryPort};

/// 读取当前用户，不存在时返回 NotFound
pub async fn require_user(
    users: &dyn UserRepositoryPort,
    user_id: Uuid,
) -> Result<UserRecord, ApplicationError> {
    users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("User", user_id))
}

/// 要求高级订阅；用户不存在同样视为无权限
pub async fn require_premium(
    users: &dyn UserRepositoryPort,
    user_id: Uuid,
) -> Result<UserRecord, ApplicationError> {
    match users.find_by_id(user_id).await? {
        Some(user) if user.plan.is_premium() => Ok(user),
        _ => Err(ApplicationError::premium_required()),
    }
}

/// 用户是否为高级订阅
pub async fn is_premium(
    users: &dyn UserRepositoryPort,
    user_id: Uuid,
) -> Result<bool, ApplicationError> {
    Ok(users
        .find_by_id(user_id)
        .await?
        .map(|u| u.plan.is_premium())
        .unwrap_or(false))
}

/// 要求已配置 TTS 服务商凭据
pub fn require_configured(tts_engine: &dyn TtsEnginePort) -> Result<(), ApplicationError> {
    if tts_engine.is_configured() {
        Ok(())
    } else {
        Err(ApplicationError::not_configured())
    }
}
