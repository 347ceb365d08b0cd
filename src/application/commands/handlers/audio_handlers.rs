//! Audio Command Handlers
//!
//! 录音保存在 `uploads/{user_id}/{uuid}.{ext}`，归上传者独有；
//! 生成的音频在用户之间共享，解除关联时不删除文件。

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::require_premium;
use crate::application::commands::{DeleteAudio, UploadAudio};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioProbePort, AudioStoragePort, LinkedAudio, UserAffirmationRepositoryPort,
    UserRepositoryPort,
};
use crate::application::targets::{AffirmationTarget, TargetResolver};
use crate::domain::{AudioFormat, AudioSource};

#[derive(Debug, Clone, Serialize)]
pub struct UploadAudioResponse {
    pub success: bool,
    pub audio_url: String,
    pub audio_duration_ms: Option<u64>,
    pub audio_source: AudioSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteAudioResponse {
    pub success: bool,
}

/// 删除被替换或解除关联的录音文件
pub(crate) async fn discard_recording(storage: &dyn AudioStoragePort, audio: Option<LinkedAudio>) {
    if let Some(audio) = audio.filter(|a| a.source == AudioSource::Recorded) {
        if let Err(e) = storage.delete(&audio.path).await {
            tracing::warn!(path = %audio.path, error = %e, "Failed to delete recorded audio");
        }
    }
}

// ============================================================================
// UploadAudio
// ============================================================================

/// UploadAudio Handler
pub struct UploadAudioHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    resolver: TargetResolver,
    storage: Arc<dyn AudioStoragePort>,
    probe: Arc<dyn AudioProbePort>,
    max_upload_size: usize,
}

impl UploadAudioHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        resolver: TargetResolver,
        storage: Arc<dyn AudioStoragePort>,
        probe: Arc<dyn AudioProbePort>,
        max_upload_size: usize,
    ) -> Self {
        Self {
            user_repo,
            resolver,
            storage,
            probe,
            max_upload_size,
        }
    }

    pub async fn handle(
        &self,
        command: UploadAudio,
    ) -> Result<UploadAudioResponse, ApplicationError> {
        require_premium(self.user_repo.as_ref(), command.user_id).await?;

        let format = AudioFormat::from_filename(&command.filename)?;
        if !AudioFormat::UPLOADABLE.contains(&format) {
            return Err(ApplicationError::validation(format!(
                "Unsupported audio format: {}",
                format.extension()
            )));
        }
        if command.data.is_empty() {
            return Err(ApplicationError::validation("Audio file is empty"));
        }
        if command.data.len() > self.max_upload_size {
            return Err(ApplicationError::validation(format!(
                "File too large (max {} bytes)",
                self.max_upload_size
            )));
        }

        let target = self
            .resolver
            .require(command.user_id, command.affirmation_id)
            .await?;

        let path = format!(
            "uploads/{}/{}.{}",
            command.user_id,
            Uuid::new_v4(),
            format.extension()
        );
        let stored = self.storage.save(&path, &command.data).await?;

        let duration_ms = command
            .duration_ms
            .or_else(|| self.probe.duration_ms(&command.data, format.extension()));

        let audio = LinkedAudio {
            path: stored.path,
            source: AudioSource::Recorded,
            duration_ms,
        };
        let replaced = match self
            .resolver
            .link_audio(command.user_id, &target, &audio)
            .await
        {
            Ok(replaced) => replaced,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&audio.path).await {
                    tracing::warn!(
                        path = %audio.path,
                        error = %cleanup,
                        "Failed to remove unlinked upload"
                    );
                }
                return Err(e);
            }
        };
        discard_recording(self.storage.as_ref(), replaced).await;

        tracing::info!(
            user_id = %command.user_id,
            affirmation_id = %command.affirmation_id,
            size = stored.size_bytes,
            "Recording uploaded"
        );

        Ok(UploadAudioResponse {
            success: true,
            audio_url: self.storage.url(&audio.path),
            audio_duration_ms: duration_ms,
            audio_source: AudioSource::Recorded,
        })
    }
}

// ============================================================================
// DeleteAudio
// ============================================================================

/// DeleteAudio Handler
pub struct DeleteAudioHandler {
    resolver: TargetResolver,
    user_affirmation_repo: Arc<dyn UserAffirmationRepositoryPort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl DeleteAudioHandler {
    pub fn new(
        resolver: TargetResolver,
        user_affirmation_repo: Arc<dyn UserAffirmationRepositoryPort>,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            resolver,
            user_affirmation_repo,
            storage,
        }
    }

    pub async fn handle(&self, command: DeleteAudio) -> Result<DeleteAudioResponse, ApplicationError> {
        // 未知 ID 没有可解除的音频
        let Some(target) = self
            .resolver
            .resolve(command.user_id, command.affirmation_id)
            .await?
        else {
            return Ok(DeleteAudioResponse { success: true });
        };

        let record_id = match &target {
            AffirmationTarget::System { overlay, .. } => overlay.as_ref().map(|o| o.id),
            AffirmationTarget::Custom { record, .. } => Some(record.id),
        };

        let linked = target.linked_audio();
        if let (Some(record_id), Some(_)) = (record_id, &linked) {
            self.user_affirmation_repo.set_audio(record_id, None).await?;
            discard_recording(self.storage.as_ref(), linked).await;

            tracing::info!(
                user_id = %command.user_id,
                affirmation_id = %command.affirmation_id,
                "Audio unlinked"
            );
        }

        Ok(DeleteAudioResponse { success: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Plan;
    use crate::test_support::TestContext;

    fn upload(ctx: &TestContext) -> UploadAudioHandler {
        UploadAudioHandler::new(
            ctx.users.clone(),
            ctx.resolver(),
            ctx.storage.clone(),
            ctx.probe.clone(),
            1024,
        )
    }

    fn command(user_id: Uuid, affirmation_id: Uuid, filename: &str, data: &[u8]) -> UploadAudio {
        UploadAudio {
            user_id,
            affirmation_id,
            filename: filename.to_string(),
            data: data.to_vec(),
            duration_ms: Some(1234),
        }
    }

    #[tokio::test]
    async fn test_upload_validations() {
        let ctx = TestContext::new().await;
        let free = ctx.create_user("free@example.com", Plan::Free).await;
        let vip = ctx.create_user("vip@example.com", Plan::Premium).await;
        let first = ctx.affirmations.find_all().await.unwrap().remove(0);
        let handler = upload(&ctx);

        let err = handler
            .handle(command(free.id, first.id, "take.webm", b"data"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Forbidden(_)));

        let err = handler
            .handle(command(vip.id, first.id, "notes.txt", b"data"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let err = handler
            .handle(command(vip.id, first.id, "take.webm", &[0u8; 2048]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let err = handler
            .handle(command(vip.id, Uuid::new_v4(), "take.webm", b"data"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_upload_removes_file_when_link_fails() {
        let ctx = TestContext::new().await;
        let vip = ctx.create_user("vip@example.com", Plan::Premium).await;
        let first = ctx.affirmations.find_all().await.unwrap().remove(0);

        sqlx::query(
            "CREATE TRIGGER reject_overlay_insert BEFORE INSERT ON user_affirmations \
             BEGIN SELECT RAISE(ABORT, 'read only'); END",
        )
        .execute(&ctx.pool)
        .await
        .unwrap();

        let err = upload(&ctx)
            .handle(command(vip.id, first.id, "take.webm", b"take"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::RepositoryError(_)), "{:?}", err);

        let uploads = ctx.storage.base_dir().join("uploads").join(vip.id.to_string());
        let remaining = std::fs::read_dir(&uploads)
            .map(|entries| entries.count())
            .unwrap_or(0);
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_upload_replaces_previous_recording() {
        let ctx = TestContext::new().await;
        let vip = ctx.create_user("vip@example.com", Plan::Premium).await;
        let first = ctx.affirmations.find_all().await.unwrap().remove(0);
        let handler = upload(&ctx);

        let one = handler
            .handle(command(vip.id, first.id, "one.webm", b"first"))
            .await
            .unwrap();
        assert_eq!(one.audio_duration_ms, Some(1234));
        assert!(one.audio_url.starts_with(&format!("/api/audio/file/uploads/{}/", vip.id)));

        let overlay = ctx
            .user_affirmations
            .find_overlay(vip.id, first.id)
            .await
            .unwrap()
            .unwrap();
        let first_path = overlay.audio_path.clone().unwrap();
        assert_eq!(overlay.audio_source, AudioSource::Recorded);

        handler
            .handle(command(vip.id, first.id, "two.mp3", b"second"))
            .await
            .unwrap();
        assert!(!ctx.storage.exists(&first_path).await);
    }

    #[tokio::test]
    async fn test_delete_audio_keeps_shared_generated_file() {
        let ctx = TestContext::new().await;
        let vip = ctx.create_user("vip@example.com", Plan::Premium).await;
        let first = ctx.affirmations.find_all().await.unwrap().remove(0);

        let shared = "voices/v1/affirmations/financeiro/shared.mp3";
        ctx.storage.save(shared, b"mp3").await.unwrap();
        ctx.user_affirmations
            .upsert_overlay_audio(
                vip.id,
                &first,
                &LinkedAudio {
                    path: shared.to_string(),
                    source: AudioSource::Elevenlabs,
                    duration_ms: None,
                },
            )
            .await
            .unwrap();

        let handler = DeleteAudioHandler::new(
            ctx.resolver(),
            ctx.user_affirmations.clone(),
            ctx.storage.clone(),
        );
        let response = handler
            .handle(DeleteAudio {
                user_id: vip.id,
                affirmation_id: first.id,
            })
            .await
            .unwrap();
        assert!(response.success);
        assert!(ctx.storage.exists(shared).await);

        let overlay = ctx
            .user_affirmations
            .find_overlay(vip.id, first.id)
            .await
            .unwrap()
            .unwrap();
        assert!(overlay.audio_path.is_none());

        // 没有音频时同样成功
        handler
            .handle(DeleteAudio {
                user_id: vip.id,
                affirmation_id: first.id,
            })
            .await
            .unwrap();

        let response = handler
            .handle(DeleteAudio {
                user_id: vip.id,
                affirmation_id: Uuid::new_v4(),
            })
            .await
            .unwrap();
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_delete_audio_removes_recording() {
        let ctx = TestContext::new().await;
        let vip = ctx.create_user("vip@example.com", Plan::Premium).await;
        let first = ctx.affirmations.find_all().await.unwrap().remove(0);

        upload(&ctx)
            .handle(command(vip.id, first.id, "take.webm", b"take"))
            .await
            .unwrap();
        let path = ctx
            .user_affirmations
            .find_overlay(vip.id, first.id)
            .await
            .unwrap()
            .and_then(|o| o.audio_path)
            .unwrap();

        DeleteAudioHandler::new(
            ctx.resolver(),
            ctx.user_affirmations.clone(),
            ctx.storage.clone(),
        )
        .handle(DeleteAudio {
            user_id: vip.id,
            affirmation_id: first.id,
        })
        .await
        .unwrap();

        assert!(!ctx.storage.exists(&path).await);
    }
}
