//! User Queries

use uuid::Uuid;

/// 当前登录用户
#[derive(Debug, Clone)]
pub struct GetCurrentUser {
    pub user_id: Uuid,
}

/// 用户播放配置（不存在时以默认值创建）
#[derive(Debug, Clone)]
pub struct GetUserConfig {
    pub user_id: Uuid,
}
