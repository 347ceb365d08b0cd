//! Config Commands

use uuid::Uuid;

use crate::domain::UserPreferencesPatch;

/// 部分更新用户播放配置
#[derive(Debug, Clone)]
pub struct UpdateUserConfig {
    pub user_id: Uuid,
    pub patch: UserPreferencesPatch,
}
