//! Generate Commands - TTS 音频生成

use uuid::Uuid;

use crate::domain::Category;

/// 试听默认文本
pub const DEFAULT_PREVIEW_TEXT: &str = "Eu me amo e me aceito completamente.";

/// 为单条肯定语生成音频并关联到用户（高级订阅）
#[derive(Debug, Clone)]
pub struct GenerateAffirmationAudio {
    pub user_id: Uuid,
    pub affirmation_id: Uuid,
    pub voice_id: Option<String>,
    pub force: bool,
}

/// 试听：合成但不保存
#[derive(Debug, Clone)]
pub struct PreviewSpeech {
    pub text: Option<String>,
    pub voice_id: Option<String>,
}

/// 批量生成（高级订阅）
#[derive(Debug, Clone)]
pub struct BatchGenerate {
    pub user_id: Uuid,
    /// 原始 ID，无法解析的按未知 ID 跳过
    pub affirmation_ids: Vec<String>,
    pub voice_id: Option<String>,
    pub force: bool,
}

/// 预生成系统默认肯定语（运维命令）
#[derive(Debug, Clone)]
pub struct GenerateDefaults {
    pub voice_id: String,
    /// 只生成该分类
    pub category: Option<Category>,
    /// 每个分类最多生成的条数
    pub count: Option<usize>,
    pub force: bool,
}
