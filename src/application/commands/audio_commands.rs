//! Audio Commands - 用户录音

use uuid::Uuid;

/// 上传录音（高级订阅）
#[derive(Debug, Clone)]
pub struct UploadAudio {
    pub user_id: Uuid,
    /// 系统肯定语 ID 或自定义肯定语 ID
    pub affirmation_id: Uuid,
    pub filename: String,
    pub data: Vec<u8>,
    /// 客户端提供的时长，缺省时从文件探测
    pub duration_ms: Option<u64>,
}

/// 解除肯定语的音频
#[derive(Debug, Clone)]
pub struct DeleteAudio {
    pub user_id: Uuid,
    pub affirmation_id: Uuid,
}
