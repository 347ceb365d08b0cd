//! 肯定语目标解析
//!
//! 生成、上传与估算接口既接受系统肯定语 ID，也接受调用者自己的自定义肯定语 ID

use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    AffirmationRecord, AffirmationRepositoryPort, CategoryRepositoryPort, LinkedAudio,
    UserAffirmationRecord, UserAffirmationRepositoryPort,
};
use crate::domain::Category;

/// 解析出的肯定语
#[derive(Debug, Clone)]
pub enum AffirmationTarget {
    /// 系统肯定语，以及调用者对它的覆盖层（如有）
    System {
        affirmation: AffirmationRecord,
        overlay: Option<UserAffirmationRecord>,
    },
    /// 调用者的自定义肯定语
    Custom {
        record: UserAffirmationRecord,
        category: Category,
    },
}

impl AffirmationTarget {
    /// 音频地址使用的 ID
    pub fn id(&self) -> Uuid {
        match self {
            Self::System { affirmation, .. } => affirmation.id,
            Self::Custom { record, .. } => record.id,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::System { affirmation, .. } => affirmation.category,
            Self::Custom { category, .. } => *category,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::System { affirmation, .. } => &affirmation.text,
            Self::Custom { record, .. } => record.custom_text.as_deref().unwrap_or_default(),
        }
    }

    /// 当前挂在用户记录上的音频
    pub fn linked_audio(&self) -> Option<LinkedAudio> {
        let record = match self {
            Self::System { overlay, .. } => overlay.as_ref()?,
            Self::Custom { record, .. } => record,
        };
        record.audio_path.as_ref().map(|path| LinkedAudio {
            path: path.clone(),
            source: record.audio_source,
            duration_ms: record.audio_duration_ms,
        })
    }
}

/// 肯定语目标解析器
#[derive(Clone)]
pub struct TargetResolver {
    affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
    category_repo: Arc<dyn CategoryRepositoryPort>,
    user_affirmation_repo: Arc<dyn UserAffirmationRepositoryPort>,
}

impl TargetResolver {
    pub fn new(
        affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
        category_repo: Arc<dyn CategoryRepositoryPort>,
        user_affirmation_repo: Arc<dyn UserAffirmationRepositoryPort>,
    ) -> Self {
        Self {
            affirmation_repo,
            category_repo,
            user_affirmation_repo,
        }
    }

    /// 解析 ID，未找到或不属于该用户时返回 None
    pub async fn resolve(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<AffirmationTarget>, ApplicationError> {
        if let Some(affirmation) = self.affirmation_repo.find_by_id(id).await? {
            let overlay = self.user_affirmation_repo.find_overlay(user_id, id).await?;
            return Ok(Some(AffirmationTarget::System {
                affirmation,
                overlay,
            }));
        }

        let record = match self.user_affirmation_repo.find_by_id(id).await? {
            Some(record) if record.user_id == user_id && record.is_custom() => record,
            _ => return Ok(None),
        };

        let category = match self.category_repo.find_by_id(record.category_id).await? {
            Some(category) => category.category,
            None => return Ok(None),
        };

        Ok(Some(AffirmationTarget::Custom { record, category }))
    }

    /// 解析外部传入的原始 ID，格式无效等同于未找到
    pub async fn resolve_raw(
        &self,
        user_id: Uuid,
        raw: &str,
    ) -> Result<Option<AffirmationTarget>, ApplicationError> {
        match Uuid::parse_str(raw.trim()) {
            Ok(id) => self.resolve(user_id, id).await,
            Err(_) => Ok(None),
        }
    }

    /// 解析 ID，未找到时返回 NotFound
    pub async fn require(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<AffirmationTarget, ApplicationError> {
        self.resolve(user_id, id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Affirmation", id))
    }

    /// 将音频挂到用户记录上，返回被替换的旧音频
    pub async fn link_audio(
        &self,
        user_id: Uuid,
        target: &AffirmationTarget,
        audio: &LinkedAudio,
    ) -> Result<Option<LinkedAudio>, ApplicationError> {
        let previous = target.linked_audio();

        match target {
            AffirmationTarget::System { affirmation, .. } => {
                self.user_affirmation_repo
                    .upsert_overlay_audio(user_id, affirmation, audio)
                    .await?;
            }
            AffirmationTarget::Custom { record, .. } => {
                self.user_affirmation_repo
                    .set_audio(record.id, Some(audio))
                    .await?;
            }
        }

        Ok(previous.filter(|old| old.path != audio.path))
    }
}
