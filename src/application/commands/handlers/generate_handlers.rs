//! Generate Command Handlers

use futures_util::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::application::access::{require_configured, require_premium};
use crate::application::commands::handlers::audio_handlers::discard_recording;
use crate::application::commands::{
    BatchGenerate, GenerateAffirmationAudio, GenerateDefaults, PreviewSpeech,
    DEFAULT_PREVIEW_TEXT,
};
use crate::application::error::ApplicationError;
use crate::application::materializer::{AudioMaterializer, MaterializeRequest, MaterializedAudio};
use crate::application::ports::{
    AffirmationRepositoryPort, AudioStoragePort, LinkedAudio, SpeechAudio, SpeechRequest,
    TtsEnginePort, UserRepositoryPort,
};
use crate::application::targets::{AffirmationTarget, TargetResolver};
use crate::domain::{validate_voice_id, AffirmationText, AudioSource, Category};

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct GenerateAudioResponse {
    pub success: bool,
    pub audio_url: String,
    pub audio_duration_ms: Option<u64>,
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItemResult {
    pub affirmation_id: Uuid,
    pub success: bool,
    pub audio_url: String,
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItemError {
    pub affirmation_id: Uuid,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchGenerateResponse {
    /// 成功条数
    pub success: usize,
    pub failed: usize,
    pub results: Vec<BatchItemResult>,
    pub errors: Vec<BatchItemError>,
}

/// 预生成结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateDefaultsReport {
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub characters_used: usize,
}

fn require_voice_id(voice_id: Option<String>) -> Result<String, ApplicationError> {
    let voice_id = voice_id
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApplicationError::validation("voice_id is required"))?;
    Ok(validate_voice_id(&voice_id)?.to_string())
}

/// 生成共享音频并关联到用户记录
struct AudioLinker {
    resolver: TargetResolver,
    materializer: Arc<AudioMaterializer>,
    storage: Arc<dyn AudioStoragePort>,
}

impl AudioLinker {
    async fn generate(
        &self,
        user_id: Uuid,
        target: &AffirmationTarget,
        voice_id: &str,
        force: bool,
    ) -> Result<MaterializedAudio, ApplicationError> {
        let audio = self
            .materializer
            .materialize(MaterializeRequest {
                affirmation_id: target.id(),
                category: target.category(),
                text: target.text().to_string(),
                voice_id: voice_id.to_string(),
                force,
            })
            .await?;

        let linked = LinkedAudio {
            path: audio.path.clone(),
            source: AudioSource::Elevenlabs,
            duration_ms: audio.duration_ms,
        };
        let replaced = self.resolver.link_audio(user_id, target, &linked).await?;
        discard_recording(self.storage.as_ref(), replaced).await;

        Ok(audio)
    }
}

// ============================================================================
// GenerateAffirmationAudio
// ============================================================================

/// GenerateAffirmationAudio Handler
pub struct GenerateAffirmationAudioHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    tts_engine: Arc<dyn TtsEnginePort>,
    linker: AudioLinker,
}

impl GenerateAffirmationAudioHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        resolver: TargetResolver,
        materializer: Arc<AudioMaterializer>,
        tts_engine: Arc<dyn TtsEnginePort>,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            user_repo,
            tts_engine,
            linker: AudioLinker {
                resolver,
                materializer,
                storage,
            },
        }
    }

    pub async fn handle(
        &self,
        command: GenerateAffirmationAudio,
    ) -> Result<GenerateAudioResponse, ApplicationError> {
        require_premium(self.user_repo.as_ref(), command.user_id).await?;
        let voice_id = require_voice_id(command.voice_id)?;
        require_configured(self.tts_engine.as_ref())?;

        let target = self
            .linker
            .resolver
            .require(command.user_id, command.affirmation_id)
            .await?;

        let audio = self
            .linker
            .generate(command.user_id, &target, &voice_id, command.force)
            .await?;

        Ok(GenerateAudioResponse {
            success: true,
            audio_url: audio.url,
            audio_duration_ms: audio.duration_ms,
            cached: audio.cached,
        })
    }
}

// ============================================================================
// PreviewSpeech
// ============================================================================

/// PreviewSpeech Handler
pub struct PreviewSpeechHandler {
    tts_engine: Arc<dyn TtsEnginePort>,
}

impl PreviewSpeechHandler {
    pub fn new(tts_engine: Arc<dyn TtsEnginePort>) -> Self {
        Self { tts_engine }
    }

    pub async fn handle(&self, command: PreviewSpeech) -> Result<SpeechAudio, ApplicationError> {
        let voice_id = require_voice_id(command.voice_id)?;
        require_configured(self.tts_engine.as_ref())?;

        let text = command
            .text
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PREVIEW_TEXT.to_string());
        let text = AffirmationText::new(text)?;

        let speech = self
            .tts_engine
            .synthesize(SpeechRequest {
                text: text.into_inner(),
                voice_id,
            })
            .await?;

        Ok(speech)
    }
}

// ============================================================================
// BatchGenerate
// ============================================================================

/// BatchGenerate Handler
///
/// 先按待生成字符数校验额度，再以 `max_concurrent` 为上限并发生成；
/// 单项失败不影响其他项，结果保持请求顺序。
pub struct BatchGenerateHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    tts_engine: Arc<dyn TtsEnginePort>,
    linker: AudioLinker,
    max_concurrent: usize,
}

impl BatchGenerateHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        resolver: TargetResolver,
        materializer: Arc<AudioMaterializer>,
        tts_engine: Arc<dyn TtsEnginePort>,
        storage: Arc<dyn AudioStoragePort>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            user_repo,
            tts_engine,
            linker: AudioLinker {
                resolver,
                materializer,
                storage,
            },
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub async fn handle(
        &self,
        command: BatchGenerate,
    ) -> Result<BatchGenerateResponse, ApplicationError> {
        require_premium(self.user_repo.as_ref(), command.user_id).await?;
        let voice_id = require_voice_id(command.voice_id)?;
        if command.affirmation_ids.is_empty() {
            return Err(ApplicationError::validation("affirmation_ids is required"));
        }
        require_configured(self.tts_engine.as_ref())?;

        let mut targets = Vec::with_capacity(command.affirmation_ids.len());
        for id in &command.affirmation_ids {
            match self.linker.resolver.resolve_raw(command.user_id, id).await? {
                Some(target) => targets.push(target),
                None => tracing::debug!(id = %id, "Skipping unknown affirmation"),
            }
        }

        // 只计算还需要调用服务商的部分
        let mut required = 0u64;
        for target in &targets {
            let pending = command.force
                || !self
                    .linker
                    .materializer
                    .is_materialized(target.id(), target.category(), &voice_id, target.text())
                    .await?;
            if pending {
                required += target.text().chars().count() as u64;
            }
        }

        if required > 0 {
            let remaining = self.tts_engine.subscription().await?.remaining_characters();
            if required > remaining {
                return Err(ApplicationError::QuotaExceeded {
                    required,
                    remaining,
                });
            }
        }

        tracing::info!(
            user_id = %command.user_id,
            items = targets.len(),
            required_characters = required,
            max_concurrent = self.max_concurrent,
            "Starting batch generation"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let user_id = command.user_id;
        let voice_id = voice_id.as_str();
        let force = command.force;

        let outcomes = join_all(targets.iter().map(|target| {
            let semaphore = semaphore.clone();
            async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => self.linker.generate(user_id, target, voice_id, force).await,
                    Err(e) => Err(ApplicationError::internal(e.to_string())),
                };
                (target.id(), result)
            }
        }))
        .await;

        let mut response = BatchGenerateResponse {
            success: 0,
            failed: 0,
            results: Vec::new(),
            errors: Vec::new(),
        };

        for (affirmation_id, result) in outcomes {
            match result {
                Ok(audio) => {
                    response.success += 1;
                    response.results.push(BatchItemResult {
                        affirmation_id,
                        success: true,
                        audio_url: audio.url,
                        cached: audio.cached,
                    });
                }
                Err(e) => {
                    tracing::warn!(affirmation_id = %affirmation_id, error = %e, "Batch item failed");
                    response.failed += 1;
                    response.errors.push(BatchItemError {
                        affirmation_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            success = response.success,
            failed = response.failed,
            "Batch generation finished"
        );

        Ok(response)
    }
}

// ============================================================================
// GenerateDefaults
// ============================================================================

/// GenerateDefaults Handler
///
/// 逐条生成，遇到限流时退避后重试一次
pub struct GenerateDefaultsHandler {
    affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
    materializer: Arc<AudioMaterializer>,
    tts_engine: Arc<dyn TtsEnginePort>,
    rate_limit_backoff: Duration,
}

impl GenerateDefaultsHandler {
    pub fn new(
        affirmation_repo: Arc<dyn AffirmationRepositoryPort>,
        materializer: Arc<AudioMaterializer>,
        tts_engine: Arc<dyn TtsEnginePort>,
        rate_limit_backoff: Duration,
    ) -> Self {
        Self {
            affirmation_repo,
            materializer,
            tts_engine,
            rate_limit_backoff,
        }
    }

    pub async fn handle(
        &self,
        command: GenerateDefaults,
    ) -> Result<GenerateDefaultsReport, ApplicationError> {
        require_configured(self.tts_engine.as_ref())?;

        let categories: Vec<Category> = match command.category {
            Some(category) => vec![category],
            None => Category::ALL.to_vec(),
        };

        let mut report = GenerateDefaultsReport::default();

        for category in categories {
            let affirmations = self.affirmation_repo.find_by_category(category).await?;
            let limit = command.count.unwrap_or(affirmations.len());

            for affirmation in affirmations.into_iter().take(limit) {
                let request = MaterializeRequest {
                    affirmation_id: affirmation.id,
                    category,
                    text: affirmation.text,
                    voice_id: command.voice_id.clone(),
                    force: command.force,
                };

                let mut result = self.materializer.materialize(request.clone()).await;
                if let Err(ApplicationError::RateLimited(_)) = &result {
                    tracing::warn!(
                        backoff_secs = self.rate_limit_backoff.as_secs(),
                        "Rate limited, backing off"
                    );
                    tokio::time::sleep(self.rate_limit_backoff).await;
                    result = self.materializer.materialize(request).await;
                }

                match result {
                    Ok(audio) if audio.cached => report.skipped += 1,
                    Ok(audio) => {
                        report.generated += 1;
                        report.characters_used += audio.characters_used;
                        tracing::info!(
                            category = category.slug(),
                            path = %audio.path,
                            "Generated default affirmation"
                        );
                    }
                    Err(e) => {
                        report.failed += 1;
                        tracing::warn!(
                            affirmation_id = %affirmation.id,
                            error = %e,
                            "Failed to generate default affirmation"
                        );
                    }
                }
            }
        }

        Ok(report)
    }
}
