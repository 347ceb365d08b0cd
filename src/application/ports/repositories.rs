//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{AudioSource, Category, Plan, UserPreferences};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// User Repository
// ============================================================================

/// 用户实体（用于持久化）
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub plan: Plan,
    pub elevenlabs_voice_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User Repository Port
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// 创建用户，邮箱重复时返回 Duplicate
    async fn create(&self, user: &UserRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError>;

    /// 修改订阅计划，用户不存在时返回 NotFound
    async fn update_plan(&self, id: Uuid, plan: Plan) -> Result<UserRecord, RepositoryError>;
}

// ============================================================================
// Catalog Repositories (Category / Affirmation)
// ============================================================================

/// 分类实体
#[derive(Debug, Clone)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub category: Category,
    pub name: String,
    pub order: i64,
    pub is_system: bool,
}

/// Category Repository Port
#[async_trait]
pub trait CategoryRepositoryPort: Send + Sync {
    /// 批量写入（仅用于初始化）
    async fn save_all(&self, categories: &[CategoryRecord]) -> Result<(), RepositoryError>;

    /// 按固定顺序返回所有分类
    async fn find_all(&self) -> Result<Vec<CategoryRecord>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepositoryError>;
}

/// 系统默认肯定语实体
#[derive(Debug, Clone)]
pub struct AffirmationRecord {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category: Category,
    pub text: String,
    pub order: i64,
}

/// Affirmation Repository Port
#[async_trait]
pub trait AffirmationRepositoryPort: Send + Sync {
    async fn save_all(&self, affirmations: &[AffirmationRecord]) -> Result<(), RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;

    /// 按 (分类顺序, 顺序) 返回所有肯定语
    async fn find_all(&self) -> Result<Vec<AffirmationRecord>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AffirmationRecord>, RepositoryError>;

    async fn find_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<AffirmationRecord>, RepositoryError>;
}

// ============================================================================
// Affirmation Audio Repository
// ============================================================================

/// 已生成音频的记录，按 (affirmation_id, voice_id) 唯一
#[derive(Debug, Clone)]
pub struct AffirmationAudioRecord {
    pub affirmation_id: Uuid,
    pub voice_id: String,
    pub path: String,
    /// 生成时文本的 MD5
    pub text_hash: String,
    pub duration_ms: Option<u64>,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// Affirmation Audio Repository Port
#[async_trait]
pub trait AffirmationAudioRepositoryPort: Send + Sync {
    async fn upsert(&self, record: &AffirmationAudioRecord) -> Result<(), RepositoryError>;

    async fn find(
        &self,
        affirmation_id: Uuid,
        voice_id: &str,
    ) -> Result<Option<AffirmationAudioRecord>, RepositoryError>;

    async fn find_by_voice(
        &self,
        voice_id: &str,
    ) -> Result<Vec<AffirmationAudioRecord>, RepositoryError>;
}

// ============================================================================
// Voice Repository
// ============================================================================

/// 已配置音色实体
#[derive(Debug, Clone)]
pub struct VoiceRecord {
    pub id: Uuid,
    /// 服务商音色 ID
    pub provider_voice_id: String,
    pub slug: String,
    pub name: String,
    pub display_name: String,
    pub gender: String,
    pub is_default: bool,
    pub is_active: bool,
    pub order: i64,
    pub preview_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Voice Repository Port
#[async_trait]
pub trait VoiceRepositoryPort: Send + Sync {
    /// 保存音色；is_default 为 true 时取消其他音色的默认标记
    async fn save(&self, voice: &VoiceRecord) -> Result<(), RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;

    /// 按顺序返回启用的音色
    async fn find_active(&self) -> Result<Vec<VoiceRecord>, RepositoryError>;

    /// 启用中的默认音色
    async fn find_default(&self) -> Result<Option<VoiceRecord>, RepositoryError>;
}

// ============================================================================
// User Affirmation Repository
// ============================================================================

/// 用户肯定语覆盖层或自定义肯定语
///
/// affirmation_id 为 None 表示自定义肯定语
#[derive(Debug, Clone)]
pub struct UserAffirmationRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub affirmation_id: Option<Uuid>,
    pub category_id: Uuid,
    pub custom_text: Option<String>,
    pub enabled: bool,
    pub order: Option<i64>,
    pub audio_path: Option<String>,
    pub audio_source: AudioSource,
    pub audio_duration_ms: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAffirmationRecord {
    pub fn is_custom(&self) -> bool {
        self.affirmation_id.is_none()
    }
}

/// 覆盖层设置更新
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlaySettings {
    pub enabled: Option<bool>,
    pub order: Option<i64>,
}

impl OverlaySettings {
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none() && self.order.is_none()
    }
}

/// 关联到覆盖层的音频
#[derive(Debug, Clone)]
pub struct LinkedAudio {
    pub path: String,
    pub source: AudioSource,
    pub duration_ms: Option<u64>,
}

/// User Affirmation Repository Port
#[async_trait]
pub trait UserAffirmationRepositoryPort: Send + Sync {
    async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserAffirmationRecord>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAffirmationRecord>, RepositoryError>;

    /// 查找用户对某条系统肯定语的覆盖层
    async fn find_overlay(
        &self,
        user_id: Uuid,
        affirmation_id: Uuid,
    ) -> Result<Option<UserAffirmationRecord>, RepositoryError>;

    /// 创建或更新系统肯定语覆盖层的设置
    async fn upsert_overlay_settings(
        &self,
        user_id: Uuid,
        affirmation: &AffirmationRecord,
        settings: OverlaySettings,
    ) -> Result<UserAffirmationRecord, RepositoryError>;

    /// 创建或更新系统肯定语覆盖层的音频
    async fn upsert_overlay_audio(
        &self,
        user_id: Uuid,
        affirmation: &AffirmationRecord,
        audio: &LinkedAudio,
    ) -> Result<UserAffirmationRecord, RepositoryError>;

    async fn create_custom(&self, record: &UserAffirmationRecord) -> Result<(), RepositoryError>;

    /// 按 ID 更新设置
    async fn update_settings(
        &self,
        id: Uuid,
        settings: OverlaySettings,
    ) -> Result<UserAffirmationRecord, RepositoryError>;

    /// 按 ID 设置或清除音频
    async fn set_audio(&self, id: Uuid, audio: Option<&LinkedAudio>) -> Result<(), RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

// ============================================================================
// User Config Repository
// ============================================================================

/// 用户播放配置
#[derive(Debug, Clone)]
pub struct UserConfigRecord {
    pub user_id: Uuid,
    pub preferences: UserPreferences,
    pub updated_at: DateTime<Utc>,
}

/// User Config Repository Port
#[async_trait]
pub trait UserConfigRepositoryPort: Send + Sync {
    /// 读取配置，不存在时以默认值创建
    async fn find_or_create(&self, user_id: Uuid) -> Result<UserConfigRecord, RepositoryError>;

    async fn save(&self, record: &UserConfigRecord) -> Result<(), RepositoryError>;
}
