//! Affirmation Commands - 用户覆盖层与自定义肯定语

use uuid::Uuid;

/// 更新单条肯定语的启用状态 / 顺序
#[derive(Debug, Clone)]
pub struct UpdateAffirmation {
    pub user_id: Uuid,
    /// 系统肯定语 ID 或自定义肯定语 ID
    pub id: Uuid,
    pub enabled: Option<bool>,
    pub order: Option<i64>,
}

/// 批量更新中的一项；无法解析的 ID 为 None
#[derive(Debug, Clone, Default)]
pub struct AffirmationUpdate {
    pub id: Option<Uuid>,
    pub enabled: Option<bool>,
    pub order: Option<i64>,
}

/// 批量更新，跳过无效项
#[derive(Debug, Clone)]
pub struct BatchUpdateAffirmations {
    pub user_id: Uuid,
    pub updates: Vec<AffirmationUpdate>,
}

/// 创建自定义肯定语（高级订阅）
#[derive(Debug, Clone)]
pub struct CreateCustomAffirmation {
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub text: String,
    pub order: Option<i64>,
}

/// 删除自定义肯定语（高级订阅）
#[derive(Debug, Clone)]
pub struct DeleteCustomAffirmation {
    pub user_id: Uuid,
    pub id: Uuid,
}
