//! ElevenLabs Client - 调用 ElevenLabs HTTP API
//!
//! 实现 TtsEnginePort trait
//!
//! ElevenLabs API:
//! POST {base}/text-to-speech/{voice_id}   Request: {"text", "model_id", "voice_settings"}  Response: audio/mpeg
//! GET  {base}/voices                      Response: {"voices": [...]}
//! GET  {base}/user                        Response: {"subscription": {...}}
//!
//! 鉴权头: `xi-api-key`

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::application::ports::{
    ProviderVoice, SpeechAudio, SpeechRequest, SubscriptionInfo, TtsEnginePort, TtsError,
};

/// 语音参数（平静、稳定的朗读风格）
#[derive(Debug, Clone, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.75,
            similarity_boost: 0.75,
            style: 0.35,
            use_speaker_boost: true,
        }
    }
}

/// 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct TextToSpeechBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

#[derive(Debug, Deserialize)]
struct VoicesBody {
    #[serde(default)]
    voices: Vec<VoiceBody>,
}

#[derive(Debug, Deserialize)]
struct VoiceBody {
    voice_id: String,
    name: String,
    category: Option<String>,
    description: Option<String>,
    preview_url: Option<String>,
    #[serde(default)]
    labels: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    #[serde(default)]
    subscription: SubscriptionBody,
}

#[derive(Debug, Default, Deserialize)]
struct SubscriptionBody {
    tier: Option<String>,
    #[serde(default)]
    character_count: u64,
    #[serde(default)]
    character_limit: u64,
    #[serde(default)]
    voice_limit: u64,
    #[serde(default)]
    can_use_instant_voice_cloning: bool,
}

/// ElevenLabs 客户端配置
#[derive(Debug, Clone)]
pub struct ElevenLabsClientConfig {
    /// API Key，为空时视为未配置
    pub api_key: Option<String>,
    /// API 基础 URL
    pub base_url: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 重试次数
    pub max_retries: u32,
    /// 线性退避基数（毫秒）
    pub retry_backoff_ms: u64,
}

impl Default for ElevenLabsClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.elevenlabs.io/v1".to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
            voice_settings: VoiceSettings::default(),
            timeout_secs: 120,
            max_retries: 2,
            retry_backoff_ms: 1000,
        }
    }
}

impl ElevenLabsClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// ElevenLabs 客户端
pub struct ElevenLabsClient {
    client: Client,
    config: ElevenLabsClientConfig,
}

impl ElevenLabsClient {
    /// 创建新的客户端
    pub fn new(config: ElevenLabsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> Result<&str, TtsError> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(TtsError::NotConfigured)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// 发送请求，对超时、连接错误、429 与 5xx 做线性退避重试
    async fn send_with_retry<F>(&self, build: F) -> Result<Response, TtsError>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0u32;
        loop {
            let err = match build().send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    status_error(status, body)
                }
                Err(e) if e.is_timeout() => TtsError::Timeout,
                Err(e) if e.is_connect() => {
                    TtsError::NetworkError(format!("Cannot connect to ElevenLabs: {}", e))
                }
                Err(e) => TtsError::NetworkError(e.to_string()),
            };

            let retryable = err.is_retryable() || is_server_error(&err);
            if !retryable || attempt >= self.config.max_retries {
                return Err(err);
            }

            attempt += 1;
            let backoff = Duration::from_millis(self.config.retry_backoff_ms * attempt as u64);
            tracing::warn!(
                attempt,
                max_retries = self.config.max_retries,
                backoff_ms = backoff.as_millis() as u64,
                error = %err,
                "ElevenLabs request failed, retrying"
            );
            tokio::time::sleep(backoff).await;
        }
    }
}

/// 将 HTTP 错误状态映射为 TtsError
fn status_error(status: StatusCode, body: String) -> TtsError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => TtsError::RateLimited(body),
        StatusCode::UNAUTHORIZED => {
            TtsError::ServiceError(format!("HTTP {}: invalid API key", status))
        }
        _ => TtsError::ServiceError(format!("HTTP {}: {}", status, body)),
    }
}

fn is_server_error(err: &TtsError) -> bool {
    matches!(err, TtsError::ServiceError(msg) if msg.starts_with("HTTP 5"))
}

#[async_trait]
impl TtsEnginePort for ElevenLabsClient {
    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechAudio, TtsError> {
        let api_key = self.api_key()?;
        let url = self.url(&format!("/text-to-speech/{}", request.voice_id));
        let body = TextToSpeechBody {
            text: &request.text,
            model_id: &self.config.model_id,
            voice_settings: &self.config.voice_settings,
        };

        tracing::debug!(
            url = %url,
            text_len = request.text.chars().count(),
            voice_id = %request.voice_id,
            "Sending text-to-speech request"
        );

        let response = self
            .send_with_retry(|| {
                self.client
                    .post(&url)
                    .header("xi-api-key", api_key)
                    .header("Accept", "audio/mpeg")
                    .json(&body)
            })
            .await
            .map_err(|e| match e {
                TtsError::ServiceError(msg) if msg.starts_with("HTTP 404") => {
                    TtsError::VoiceNotFound(request.voice_id.clone())
                }
                other => other,
            })?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        tracing::info!(
            voice_id = %request.voice_id,
            audio_size = audio_data.len(),
            "Text-to-speech completed"
        );

        Ok(SpeechAudio {
            audio_data,
            content_type,
        })
    }

    async fn list_voices(&self) -> Result<Vec<ProviderVoice>, TtsError> {
        let api_key = self.api_key()?;
        let url = self.url("/voices");

        let response = self
            .send_with_retry(|| {
                self.client
                    .get(&url)
                    .header("xi-api-key", api_key)
                    .header("Accept", "application/json")
            })
            .await?;

        let body: VoicesBody = response
            .json()
            .await
            .map_err(|e| TtsError::InvalidResponse(e.to_string()))?;

        Ok(body
            .voices
            .into_iter()
            .map(|v| ProviderVoice {
                voice_id: v.voice_id,
                name: v.name,
                category: v.category.unwrap_or_else(|| "unknown".to_string()),
                description: v.description.unwrap_or_default(),
                preview_url: v.preview_url,
                labels: v.labels,
            })
            .collect())
    }

    async fn subscription(&self) -> Result<SubscriptionInfo, TtsError> {
        let api_key = self.api_key()?;
        let url = self.url("/user");

        let response = self
            .send_with_retry(|| {
                self.client
                    .get(&url)
                    .header("xi-api-key", api_key)
                    .header("Accept", "application/json")
            })
            .await?;

        let body: UserBody = response
            .json()
            .await
            .map_err(|e| TtsError::InvalidResponse(e.to_string()))?;
        let sub = body.subscription;

        Ok(SubscriptionInfo {
            tier: sub.tier.unwrap_or_else(|| "unknown".to_string()),
            character_count: sub.character_count,
            character_limit: sub.character_limit,
            voice_limit: sub.voice_limit,
            can_use_instant_voice_cloning: sub.can_use_instant_voice_cloning,
        })
    }
}
