//! Audio Query Handlers

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::AudioStoragePort;
use crate::application::queries::GetAudioFile;
use crate::domain::AudioFormat;

/// 音频文件位置
#[derive(Debug, Clone)]
pub struct AudioFileResponse {
    pub file_path: PathBuf,
    pub content_type: &'static str,
}

/// GetAudioFile Handler
pub struct GetAudioFileHandler {
    storage: Arc<dyn AudioStoragePort>,
}

impl GetAudioFileHandler {
    pub fn new(storage: Arc<dyn AudioStoragePort>) -> Self {
        Self { storage }
    }

    pub async fn handle(&self, query: GetAudioFile) -> Result<AudioFileResponse, ApplicationError> {
        // 越界路径与不存在的文件同样视为 NotFound
        let file_path = self.storage.resolve(&query.path)?;
        if !self.storage.exists(&query.path).await {
            return Err(ApplicationError::not_found("Audio file", &query.path));
        }

        Ok(AudioFileResponse {
            file_path,
            content_type: AudioFormat::mime_for_path(&query.path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestContext;

    #[tokio::test]
    async fn test_get_audio_file() {
        let ctx = TestContext::new().await;
        ctx.storage.save("uploads/u1/take.webm", b"webm").await.unwrap();
        let handler = GetAudioFileHandler::new(ctx.storage.clone());

        let file = handler
            .handle(GetAudioFile {
                path: "uploads/u1/take.webm".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(file.content_type, "audio/webm");
        assert!(file.file_path.is_file());

        for path in ["uploads/u1/missing.mp3", "../secret.mp3", "/etc/passwd", ""] {
            let err = handler
                .handle(GetAudioFile {
                    path: path.to_string(),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, ApplicationError::NotFound { .. }), "{}", path);
        }
    }
}
