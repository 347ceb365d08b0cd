//! Voice Query Handlers

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::{is_premium, require_configured};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ProviderVoice, SubscriptionInfo, TtsEnginePort, UserRepositoryPort, VoiceRecord,
    VoiceRepositoryPort,
};
use crate::application::queries::{
    GetDefaultVoice, GetSubscriptionInfo, GetVoicePreview, ListConfiguredVoices,
    ListProviderVoices, ListRecommendedVoices,
};

/// 推荐男声
pub const RECOMMENDED_MALE: [&str; 5] = ["Daniel", "Marcus", "Antoni", "Adam", "Arnold"];
/// 推荐女声
pub const RECOMMENDED_FEMALE: [&str; 5] = ["Charlotte", "Aria", "Sarah", "Rachel", "Domi"];

// ============================================================================
// Response DTOs
// ============================================================================

/// 已配置音色
#[derive(Debug, Clone, Serialize)]
pub struct ConfiguredVoiceResponse {
    pub id: Uuid,
    pub elevenlabs_id: String,
    pub slug: String,
    pub name: String,
    pub display_name: String,
    pub gender: String,
    pub is_default: bool,
    pub is_active: bool,
    pub order: i64,
    pub preview_url: Option<String>,
}

impl From<VoiceRecord> for ConfiguredVoiceResponse {
    fn from(record: VoiceRecord) -> Self {
        Self {
            id: record.id,
            elevenlabs_id: record.provider_voice_id,
            slug: record.slug,
            name: record.name,
            display_name: record.display_name,
            gender: record.gender,
            is_default: record.is_default,
            is_active: record.is_active,
            order: record.order,
            preview_url: record.preview_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfiguredVoicesResponse {
    pub voices: Vec<ConfiguredVoiceResponse>,
    pub default_voice_id: Option<String>,
}

/// 按类别分组的服务商音色
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupedVoicesResponse {
    pub premade: Vec<ProviderVoice>,
    pub cloned: Vec<ProviderVoice>,
    pub generated: Vec<ProviderVoice>,
    pub other: Vec<ProviderVoice>,
    pub total: usize,
}

impl GroupedVoicesResponse {
    pub fn group(voices: Vec<ProviderVoice>) -> Self {
        let mut grouped = Self {
            total: voices.len(),
            ..Default::default()
        };
        for voice in voices {
            match voice.category.as_str() {
                "premade" => grouped.premade.push(voice),
                "cloned" => grouped.cloned.push(voice),
                "generated" => grouped.generated.push(voice),
                _ => grouped.other.push(voice),
            }
        }
        grouped
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendedVoicesResponse {
    pub male: Vec<ProviderVoice>,
    pub female: Vec<ProviderVoice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub tier: String,
    pub character_count: u64,
    pub character_limit: u64,
    pub remaining_characters: u64,
    pub voice_limit: u64,
    pub can_use_instant_voice_cloning: bool,
}

impl From<SubscriptionInfo> for SubscriptionResponse {
    fn from(info: SubscriptionInfo) -> Self {
        Self {
            remaining_characters: info.remaining_characters(),
            tier: info.tier,
            character_count: info.character_count,
            character_limit: info.character_limit,
            voice_limit: info.voice_limit,
            can_use_instant_voice_cloning: info.can_use_instant_voice_cloning,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VoicePreviewResponse {
    pub voice_id: String,
    pub name: String,
    pub preview_url: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// ListProviderVoices Handler
pub struct ListProviderVoicesHandler {
    tts_engine: Arc<dyn TtsEnginePort>,
}

impl ListProviderVoicesHandler {
    pub fn new(tts_engine: Arc<dyn TtsEnginePort>) -> Self {
        Self { tts_engine }
    }

    pub async fn handle(
        &self,
        _query: ListProviderVoices,
    ) -> Result<GroupedVoicesResponse, ApplicationError> {
        require_configured(self.tts_engine.as_ref())?;
        let voices = self.tts_engine.list_voices().await?;
        Ok(GroupedVoicesResponse::group(voices))
    }
}

/// ListConfiguredVoices Handler
pub struct ListConfiguredVoicesHandler {
    voice_repo: Arc<dyn VoiceRepositoryPort>,
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl ListConfiguredVoicesHandler {
    pub fn new(
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        user_repo: Arc<dyn UserRepositoryPort>,
    ) -> Self {
        Self {
            voice_repo,
            user_repo,
        }
    }

    pub async fn handle(
        &self,
        query: ListConfiguredVoices,
    ) -> Result<ConfiguredVoicesResponse, ApplicationError> {
        let premium = is_premium(self.user_repo.as_ref(), query.user_id).await?;

        let voices: Vec<VoiceRecord> = self
            .voice_repo
            .find_active()
            .await?
            .into_iter()
            .filter(|v| premium || v.is_default)
            .collect();

        let default_voice_id = voices
            .iter()
            .find(|v| v.is_default)
            .map(|v| v.provider_voice_id.clone());

        Ok(ConfiguredVoicesResponse {
            voices: voices.into_iter().map(ConfiguredVoiceResponse::from).collect(),
            default_voice_id,
        })
    }
}

/// GetDefaultVoice Handler
pub struct GetDefaultVoiceHandler {
    voice_repo: Arc<dyn VoiceRepositoryPort>,
}

impl GetDefaultVoiceHandler {
    pub fn new(voice_repo: Arc<dyn VoiceRepositoryPort>) -> Self {
        Self { voice_repo }
    }

    pub async fn handle(
        &self,
        _query: GetDefaultVoice,
    ) -> Result<ConfiguredVoiceResponse, ApplicationError> {
        let voice = self
            .voice_repo
            .find_default()
            .await?
            .ok_or_else(|| ApplicationError::not_found("Voice", "default"))?;

        Ok(ConfiguredVoiceResponse::from(voice))
    }
}

/// ListRecommendedVoices Handler
pub struct ListRecommendedVoicesHandler {
    tts_engine: Arc<dyn TtsEnginePort>,
}

impl ListRecommendedVoicesHandler {
    pub fn new(tts_engine: Arc<dyn TtsEnginePort>) -> Self {
        Self { tts_engine }
    }

    pub async fn handle(
        &self,
        _query: ListRecommendedVoices,
    ) -> Result<RecommendedVoicesResponse, ApplicationError> {
        require_configured(self.tts_engine.as_ref())?;
        let voices = self.tts_engine.list_voices().await?;

        let pick = |names: &[&str]| -> Vec<ProviderVoice> {
            voices
                .iter()
                .filter(|v| names.contains(&v.name.as_str()))
                .cloned()
                .collect()
        };

        Ok(RecommendedVoicesResponse {
            male: pick(&RECOMMENDED_MALE[..]),
            female: pick(&RECOMMENDED_FEMALE[..]),
        })
    }
}

/// GetSubscriptionInfo Handler
pub struct GetSubscriptionInfoHandler {
    tts_engine: Arc<dyn TtsEnginePort>,
}

impl GetSubscriptionInfoHandler {
    pub fn new(tts_engine: Arc<dyn TtsEnginePort>) -> Self {
        Self { tts_engine }
    }

    pub async fn handle(
        &self,
        _query: GetSubscriptionInfo,
    ) -> Result<SubscriptionResponse, ApplicationError> {
        require_configured(self.tts_engine.as_ref())?;
        let info = self.tts_engine.subscription().await?;
        Ok(SubscriptionResponse::from(info))
    }
}

/// GetVoicePreview Handler
pub struct GetVoicePreviewHandler {
    tts_engine: Arc<dyn TtsEnginePort>,
}

impl GetVoicePreviewHandler {
    pub fn new(tts_engine: Arc<dyn TtsEnginePort>) -> Self {
        Self { tts_engine }
    }

    pub async fn handle(
        &self,
        query: GetVoicePreview,
    ) -> Result<VoicePreviewResponse, ApplicationError> {
        require_configured(self.tts_engine.as_ref())?;

        let voice = self
            .tts_engine
            .list_voices()
            .await?
            .into_iter()
            .find(|v| v.voice_id == query.voice_id)
            .ok_or_else(|| ApplicationError::not_found("Voice", &query.voice_id))?;

        Ok(VoicePreviewResponse {
            voice_id: voice.voice_id,
            name: voice.name,
            preview_url: voice.preview_url,
        })
    }
}
