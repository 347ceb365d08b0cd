//! Usage Queries - 生成字符数估算

use uuid::Uuid;

/// 估算生成指定肯定语需要的字符数
///
/// `affirmation_ids` 为空时估算全部系统肯定语；无法解析的 ID 按未知跳过
#[derive(Debug, Clone)]
pub struct EstimateUsage {
    pub user_id: Uuid,
    pub affirmation_ids: Vec<String>,
    pub voice_id: Option<String>,
}

/// 按分类统计系统肯定语的字符数（运维命令）
#[derive(Debug, Clone, Default)]
pub struct EstimateCatalog;
