//! Catalog Query Handlers
//!
//! 用户视图 = 系统肯定语 + 用户覆盖层 + 用户自定义肯定语，
//! 音频优先取用户自己的，其次取默认音色已生成的音频。

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    AffirmationAudioRecord, AffirmationAudioRepositoryPort, AffirmationRecord,
    AffirmationRepositoryPort, AudioStoragePort, CategoryRecord, CategoryRepositoryPort,
    UserAffirmationRecord, UserAffirmationRepositoryPort, VoiceRepositoryPort,
};
use crate::application::queries::{ListCategories, ListDefaultAffirmations, ListUserAffirmations};
use crate::domain::{text_hash, AudioSource, Category};

/// 自定义肯定语未设置顺序时排在分类末尾
pub const CUSTOM_DEFAULT_ORDER: i64 = 999;

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: &'static str,
    pub order: i64,
    pub is_system: bool,
}

impl From<CategoryRecord> for CategoryResponse {
    fn from(record: CategoryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            slug: record.category.slug(),
            order: record.order,
            is_system: record.is_system,
        }
    }
}

/// 系统默认肯定语
#[derive(Debug, Clone, Serialize)]
pub struct DefaultAffirmationItem {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category: &'static str,
    pub text: String,
    pub order: i64,
    pub enabled: bool,
    pub audio_url: Option<String>,
    pub is_custom: bool,
}

/// 用户视图中的一条肯定语
#[derive(Debug, Clone, Serialize)]
pub struct UserAffirmationItem {
    /// 系统肯定语 ID，或自定义肯定语的记录 ID
    pub id: Uuid,
    pub user_affirmation_id: Option<Uuid>,
    pub category_id: Uuid,
    pub category: &'static str,
    pub text: String,
    pub enabled: bool,
    pub order: i64,
    pub audio_url: Option<String>,
    pub audio_source: AudioSource,
    pub audio_duration_ms: Option<u64>,
    pub is_custom: bool,
}

impl UserAffirmationItem {
    /// 自定义肯定语
    pub fn custom(
        record: &UserAffirmationRecord,
        category: Category,
        storage: &dyn AudioStoragePort,
    ) -> Self {
        Self {
            id: record.id,
            user_affirmation_id: Some(record.id),
            category_id: record.category_id,
            category: category.slug(),
            text: record.custom_text.clone().unwrap_or_default(),
            enabled: record.enabled,
            order: record.order.unwrap_or(CUSTOM_DEFAULT_ORDER),
            audio_url: record.audio_path.as_deref().map(|p| storage.url(p)),
            audio_source: record.audio_source,
            audio_duration_ms: record.audio_duration_ms,
            is_custom: true,
        }
    }

    /// 系统肯定语叠加覆盖层
    pub fn overlay(
        affirmation: &AffirmationRecord,
        overlay: Option<&UserAffirmationRecord>,
        default_audio: Option<&AffirmationAudioRecord>,
        storage: &dyn AudioStoragePort,
    ) -> Self {
        let own_audio = overlay.and_then(|o| o.audio_path.as_deref().map(|path| (o, path)));

        let (audio_url, audio_source, audio_duration_ms) = match (own_audio, default_audio) {
            (Some((o, path)), _) => (Some(storage.url(path)), o.audio_source, o.audio_duration_ms),
            (None, Some(record)) => (
                Some(storage.url(&record.path)),
                AudioSource::System,
                record.duration_ms,
            ),
            (None, None) => (None, AudioSource::System, None),
        };

        Self {
            id: affirmation.id,
            user_affirmation_id: overlay.map(|o| o.id),
            category_id: affirmation.category_id,
            category: affirmation.category.slug(),
            text: affirmation.text.clone(),
            enabled: overlay.map(|o| o.enabled).unwrap_or(true),
            order: overlay.and_then(|o| o.order).unwrap_or(affirmation.order),
            audio_url,
            audio_source,
            audio_duration_ms,
            is_custom: false,
        }
    }
}

/// 默认音色已生成的、与当前文本一致的音频
pub(crate) async fn default_voice_audio(
    voice_repo: &dyn VoiceRepositoryPort,
    audio_repo: &dyn AffirmationAudioRepositoryPort,
    affirmations: &[AffirmationRecord],
) -> Result<HashMap<Uuid, AffirmationAudioRecord>, ApplicationError> {
    let Some(voice) = voice_repo.find_default().await? else {
        return Ok(HashMap::new());
    };

    let hashes: HashMap<Uuid, String> = affirmations
        .iter()
        .map(|a| (a.id, text_hash(&a.text)))
        .collect();

    Ok(audio_repo
        .find_by_voice(&voice.provider_voice_id)
        .await?
        .into_iter()
        .filter(|r| hashes.get(&r.affirmation_id) == Some(&r.text_hash))
        .map(|r| (r.affirmation_id, r))
        .collect())
}

// ============================================================================
// Handlers
// ============================================================================

/// ListCategories Handler
pub struct ListCategoriesHandler {
    category_repo: Arc<dyn CategoryRepositoryPort>,
}

impl ListCategoriesHandler {
    pub fn new(category_repo: Arc<dyn CategoryRepositoryPort>) -> Self {
        Self { category_repo }
    }

    pub async fn handle(
        &self,
        _query: ListCategories,
    ) -> Result<Vec<CategoryResponse>, ApplicationError> {
        let categories = self.category_repo.find_all().await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }
}

/// ListDefaultAffirmations Handler
pub struct ListDefaultAffirmationsHandler {
    affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
    voice_repo: Arc<dyn VoiceRepositoryPort>,
    audio_repo: Arc<dyn AffirmationAudioRepositoryPort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl ListDefaultAffirmationsHandler {
    pub fn new(
        affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        audio_repo: Arc<dyn AffirmationAudioRepositoryPort>,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            affirmation_repo,
            voice_repo,
            audio_repo,
            storage,
        }
    }

    pub async fn handle(
        &self,
        _query: ListDefaultAffirmations,
    ) -> Result<Vec<DefaultAffirmationItem>, ApplicationError> {
        let affirmations = self.affirmation_repo.find_all().await?;
        let audio = default_voice_audio(
            self.voice_repo.as_ref(),
            self.audio_repo.as_ref(),
            &affirmations,
        )
        .await?;

        Ok(affirmations
            .into_iter()
            .map(|a| DefaultAffirmationItem {
                audio_url: audio.get(&a.id).map(|r| self.storage.url(&r.path)),
                id: a.id,
                category_id: a.category_id,
                category: a.category.slug(),
                text: a.text,
                order: a.order,
                enabled: true,
                is_custom: false,
            })
            .collect())
    }
}

/// ListUserAffirmations Handler
pub struct ListUserAffirmationsHandler {
    affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
    category_repo: Arc<dyn CategoryRepositoryPort>,
    user_affirmation_repo: Arc<dyn UserAffirmationRepositoryPort>,
    voice_repo: Arc<dyn VoiceRepositoryPort>,
    audio_repo: Arc<dyn AffirmationAudioRepositoryPort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl ListUserAffirmationsHandler {
    pub fn new(
        affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
        category_repo: Arc<dyn CategoryRepositoryPort>,
        user_affirmation_repo: Arc<dyn UserAffirmationRepositoryPort>,
        voice_repo: Arc<dyn VoiceRepositoryPort>,
        audio_repo: Arc<dyn AffirmationAudioRepositoryPort>,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            affirmation_repo,
            category_repo,
            user_affirmation_repo,
            voice_repo,
            audio_repo,
            storage,
        }
    }

    pub async fn handle(
        &self,
        query: ListUserAffirmations,
    ) -> Result<Vec<UserAffirmationItem>, ApplicationError> {
        let affirmations = self.affirmation_repo.find_all().await?;
        let default_audio = default_voice_audio(
            self.voice_repo.as_ref(),
            self.audio_repo.as_ref(),
            &affirmations,
        )
        .await?;

        let categories: HashMap<Uuid, Category> = self
            .category_repo
            .find_all()
            .await?
            .into_iter()
            .map(|c| (c.id, c.category))
            .collect();

        let (custom, overlays): (Vec<_>, Vec<_>) = self
            .user_affirmation_repo
            .find_by_user(query.user_id)
            .await?
            .into_iter()
            .partition(|r| r.is_custom());

        let overlays: HashMap<Uuid, UserAffirmationRecord> = overlays
            .into_iter()
            .filter_map(|o| o.affirmation_id.map(|id| (id, o)))
            .collect();

        let mut items: Vec<(Category, UserAffirmationItem)> = affirmations
            .iter()
            .map(|a| {
                let item = UserAffirmationItem::overlay(
                    a,
                    overlays.get(&a.id),
                    default_audio.get(&a.id),
                    self.storage.as_ref(),
                );
                (a.category, item)
            })
            .collect();

        items.extend(custom.iter().filter_map(|record| {
            let category = *categories.get(&record.category_id)?;
            Some((
                category,
                UserAffirmationItem::custom(record, category, self.storage.as_ref()),
            ))
        }));

        items.sort_by_key(|(category, item)| (category.order(), item.order));

        Ok(items.into_iter().map(|(_, item)| item).collect())
    }
}
