//! Fake TTS Client - 用于测试的 TTS 客户端
//!
//! 始终返回固定的音频字节，不实际调用 TTS 服务

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{
    ProviderVoice, SpeechAudio, SpeechRequest, SubscriptionInfo, TtsEnginePort, TtsError,
};

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 固定返回的音频数据
    pub audio_data: Vec<u8>,
    /// 模拟推理延迟
    pub latency: Duration,
    /// 订阅额度
    pub character_limit: u64,
    pub character_count: u64,
    /// 为 false 时模拟未配置凭据
    pub configured: bool,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            audio_data: b"ID3fake-mp3-audio".to_vec(),
            latency: Duration::from_millis(20),
            character_limit: 10_000,
            character_count: 0,
            configured: true,
        }
    }
}

/// Fake TTS Client
///
/// 用于测试：记录调用次数，可以让指定文本失败
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    calls: AtomicUsize,
    failing_texts: Mutex<Vec<String>>,
}

impl FakeTtsClient {
    pub fn new() -> Self {
        Self::with_config(FakeTtsClientConfig::default())
    }

    pub fn with_config(config: FakeTtsClientConfig) -> Self {
        Self {
            config,
            calls: AtomicUsize::new(0),
            failing_texts: Mutex::new(Vec::new()),
        }
    }

    /// synthesize 被调用的次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 让指定文本的合成返回服务错误
    pub fn fail_on(&self, text: &str) {
        if let Ok(mut texts) = self.failing_texts.lock() {
            texts.push(text.to_string());
        }
    }

    fn should_fail(&self, text: &str) -> bool {
        self.failing_texts
            .lock()
            .map(|texts| texts.iter().any(|t| t == text))
            .unwrap_or(false)
    }

    fn voice(voice_id: &str, name: &str, category: &str) -> ProviderVoice {
        ProviderVoice {
            voice_id: voice_id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            description: String::new(),
            preview_url: Some(format!("https://example.com/previews/{}.mp3", voice_id)),
            labels: HashMap::new(),
        }
    }
}

impl Default for FakeTtsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    fn is_configured(&self) -> bool {
        self.config.configured
    }

    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechAudio, TtsError> {
        if !self.config.configured {
            return Err(TtsError::NotConfigured);
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            text_len = request.text.len(),
            voice_id = %request.voice_id,
            "FakeTtsClient: returning fixed audio"
        );

        tokio::time::sleep(self.config.latency).await;

        if self.should_fail(&request.text) {
            return Err(TtsError::ServiceError("HTTP 500: simulated failure".to_string()));
        }

        Ok(SpeechAudio {
            audio_data: self.config.audio_data.clone(),
            content_type: "audio/mpeg".to_string(),
        })
    }

    async fn list_voices(&self) -> Result<Vec<ProviderVoice>, TtsError> {
        if !self.config.configured {
            return Err(TtsError::NotConfigured);
        }

        Ok(vec![
            Self::voice("fCxG8OHm4STbIsWe4aT9", "Harrison Gale", "professional"),
            Self::voice("onwK4e9ZLuTAKqWW03F9", "Daniel", "premade"),
            Self::voice("XB0fDUnXU5powFXDhCwa", "Charlotte", "premade"),
            Self::voice("cl0n3d", "Minha Voz", "cloned"),
            Self::voice("g3n3r4t3d", "Calm Narrator", "generated"),
        ])
    }

    async fn subscription(&self) -> Result<SubscriptionInfo, TtsError> {
        if !self.config.configured {
            return Err(TtsError::NotConfigured);
        }

        Ok(SubscriptionInfo {
            tier: "creator".to_string(),
            character_count: self.config.character_count,
            character_limit: self.config.character_limit,
            voice_limit: 30,
            can_use_instant_voice_cloning: true,
        })
    }
}
