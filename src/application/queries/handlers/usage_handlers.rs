//! Usage Query Handlers - 字符数估算

use serde::Serialize;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::materializer::AudioMaterializer;
use crate::application::ports::{AffirmationRepositoryPort, TtsEnginePort};
use crate::application::queries::{EstimateCatalog, EstimateUsage};
use crate::application::targets::{AffirmationTarget, TargetResolver};
use crate::domain::Category;

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UsageEstimateResponse {
    pub affirmation_count: usize,
    /// 按 Unicode 字符计
    pub total_characters: u64,
    /// 尚未为该音色生成的部分
    pub pending_characters: u64,
    /// 服务商未配置或查询失败时为 None
    pub remaining_characters: Option<u64>,
    pub can_generate: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryUsage {
    pub category: Category,
    pub name: &'static str,
    pub count: usize,
    pub characters: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEstimateResponse {
    pub categories: Vec<CategoryUsage>,
    pub total_count: usize,
    pub total_characters: u64,
    pub remaining_characters: Option<u64>,
}

impl CatalogEstimateResponse {
    /// 剩余额度是否足够生成全部
    pub fn is_sufficient(&self) -> Option<bool> {
        self.remaining_characters
            .map(|remaining| remaining >= self.total_characters)
    }
}

fn char_count(text: &str) -> u64 {
    text.chars().count() as u64
}

/// 剩余额度，未配置或查询失败时为 None
async fn remaining_characters(tts_engine: &dyn TtsEnginePort) -> Option<u64> {
    if !tts_engine.is_configured() {
        return None;
    }
    match tts_engine.subscription().await {
        Ok(info) => Some(info.remaining_characters()),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch subscription info");
            None
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// EstimateUsage Handler
pub struct EstimateUsageHandler {
    affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
    resolver: TargetResolver,
    materializer: Arc<AudioMaterializer>,
    tts_engine: Arc<dyn TtsEnginePort>,
}

impl EstimateUsageHandler {
    pub fn new(
        affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
        resolver: TargetResolver,
        materializer: Arc<AudioMaterializer>,
        tts_engine: Arc<dyn TtsEnginePort>,
    ) -> Self {
        Self {
            affirmation_repo,
            resolver,
            materializer,
            tts_engine,
        }
    }

    pub async fn handle(
        &self,
        query: EstimateUsage,
    ) -> Result<UsageEstimateResponse, ApplicationError> {
        let targets: Vec<AffirmationTarget> = if query.affirmation_ids.is_empty() {
            self.affirmation_repo
                .find_all()
                .await?
                .into_iter()
                .map(|affirmation| AffirmationTarget::System {
                    affirmation,
                    overlay: None,
                })
                .collect()
        } else {
            let mut targets = Vec::with_capacity(query.affirmation_ids.len());
            for id in &query.affirmation_ids {
                if let Some(target) = self.resolver.resolve_raw(query.user_id, id).await? {
                    targets.push(target);
                }
            }
            targets
        };

        let total_characters: u64 = targets.iter().map(|t| char_count(t.text())).sum();

        let voice_id = query
            .voice_id
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let pending_characters = match voice_id {
            Some(voice_id) => {
                let mut pending = 0;
                for target in &targets {
                    let done = self
                        .materializer
                        .is_materialized(target.id(), target.category(), voice_id, target.text())
                        .await?;
                    if !done {
                        pending += char_count(target.text());
                    }
                }
                pending
            }
            None => total_characters,
        };

        let remaining_characters = remaining_characters(self.tts_engine.as_ref()).await;

        Ok(UsageEstimateResponse {
            affirmation_count: targets.len(),
            total_characters,
            pending_characters,
            remaining_characters,
            can_generate: remaining_characters
                .map(|remaining| remaining >= pending_characters)
                .unwrap_or(false),
        })
    }
}

/// EstimateCatalog Handler
pub struct EstimateCatalogHandler {
    affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
    tts_engine: Arc<dyn TtsEnginePort>,
}

impl EstimateCatalogHandler {
    pub fn new(
        affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
        tts_engine: Arc<dyn TtsEnginePort>,
    ) -> Self {
        Self {
            affirmation_repo,
            tts_engine,
        }
    }

    pub async fn handle(
        &self,
        _query: EstimateCatalog,
    ) -> Result<CatalogEstimateResponse, ApplicationError> {
        let mut categories = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let affirmations = self.affirmation_repo.find_by_category(category).await?;
            categories.push(CategoryUsage {
                category,
                name: category.name(),
                count: affirmations.len(),
                characters: affirmations.iter().map(|a| char_count(&a.text)).sum(),
            });
        }

        Ok(CatalogEstimateResponse {
            total_count: categories.iter().map(|c| c.count).sum(),
            total_characters: categories.iter().map(|c| c.characters).sum(),
            categories,
            remaining_characters: remaining_characters(self.tts_engine.as_ref()).await,
        })
    }
}
