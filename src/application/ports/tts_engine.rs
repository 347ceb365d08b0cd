//! TTS Engine Port - 外部语音合成服务抽象
//!
//! 定义语音合成、音色列表与额度查询接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("TTS provider not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Voice not found: {0}")]
    VoiceNotFound(String),
}

impl TtsError {
    /// 是否值得重试（超时、连接失败、限流）
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TtsError::Timeout | TtsError::NetworkError(_) | TtsError::RateLimited(_)
        )
    }
}

/// 语音合成请求
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// 要合成的文本
    pub text: String,
    /// 服务商音色 ID
    pub voice_id: String,
}

/// 语音合成结果
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    /// 编码后的音频（MP3）
    pub audio_data: Vec<u8>,
    pub content_type: String,
}

/// 服务商音色
#[derive(Debug, Clone, Serialize)]
pub struct ProviderVoice {
    pub voice_id: String,
    pub name: String,
    /// premade / cloned / generated / ...
    pub category: String,
    pub description: String,
    pub preview_url: Option<String>,
    pub labels: HashMap<String, String>,
}

/// 订阅额度信息
#[derive(Debug, Clone, Default)]
pub struct SubscriptionInfo {
    pub tier: String,
    pub character_count: u64,
    pub character_limit: u64,
    pub voice_limit: u64,
    pub can_use_instant_voice_cloning: bool,
}

impl SubscriptionInfo {
    /// 剩余字符数，不会小于 0
    pub fn remaining_characters(&self) -> u64 {
        self.character_limit.saturating_sub(self.character_count)
    }
}

/// TTS Engine Port
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 是否已配置凭据
    fn is_configured(&self) -> bool;

    /// 合成语音
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechAudio, TtsError>;

    /// 列出账户可用的音色
    async fn list_voices(&self) -> Result<Vec<ProviderVoice>, TtsError>;

    /// 查询订阅额度
    async fn subscription(&self) -> Result<SubscriptionInfo, TtsError>;
}
