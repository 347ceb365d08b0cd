//! Audio Materializer - 肯定语音频物化
//!
//! 给定肯定语文本与音色，确保 `(voice_id, category, affirmation_id)` 对应的音频存在于存储中：
//! 1. 同一地址的并发请求串行化（进程内 in-flight 锁）
//! 2. 已有记录且文本指纹一致、文件存在 → 直接返回缓存
//! 3. 无记录但文件已存在（离线生成）→ 收编该文件
//! 4. 否则调用 TTS，探测时长，原子写入并更新记录

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    AffirmationAudioRecord, AffirmationAudioRepositoryPort, AudioProbePort, AudioStoragePort,
    SpeechRequest, TtsEnginePort,
};
use crate::domain::{estimate_duration_ms, text_hash, AudioKey, Category};

/// 物化请求
#[derive(Debug, Clone)]
pub struct MaterializeRequest {
    pub affirmation_id: Uuid,
    pub category: Category,
    pub text: String,
    pub voice_id: String,
    /// 忽略缓存强制重新生成
    pub force: bool,
}

/// 物化结果
#[derive(Debug, Clone)]
pub struct MaterializedAudio {
    pub path: String,
    pub url: String,
    pub duration_ms: Option<u64>,
    pub size_bytes: u64,
    pub cached: bool,
    /// 本次消耗的服务商字符数（缓存命中为 0）
    pub characters_used: usize,
}

/// 持有某个地址的 in-flight 锁，释放时清理空闲条目
struct KeyLock<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyLock<'_> {
    fn drop(&mut self) {
        // guard 内部持有一份 Arc，先释放再判断引用计数
        self.guard.take();
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// 肯定语音频物化服务
pub struct AudioMaterializer {
    tts_engine: Arc<dyn TtsEnginePort>,
    storage: Arc<dyn AudioStoragePort>,
    probe: Arc<dyn AudioProbePort>,
    audio_repo: Arc<dyn AffirmationAudioRepositoryPort>,
    in_flight: DashMap<String, Arc<Mutex<()>>>,
}

impl AudioMaterializer {
    pub fn new(
        tts_engine: Arc<dyn TtsEnginePort>,
        storage: Arc<dyn AudioStoragePort>,
        probe: Arc<dyn AudioProbePort>,
        audio_repo: Arc<dyn AffirmationAudioRepositoryPort>,
    ) -> Self {
        Self {
            tts_engine,
            storage,
            probe,
            audio_repo,
            in_flight: DashMap::new(),
        }
    }

    /// 当前持有或等待中的地址数量
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    async fn lock_key(&self, key: &str) -> KeyLock<'_> {
        let lock = self.in_flight.entry(key.to_string()).or_default().clone();
        let guard = lock.lock_owned().await;
        KeyLock {
            locks: &self.in_flight,
            key: key.to_string(),
            guard: Some(guard),
        }
    }

    /// 物化音频
    pub async fn materialize(
        &self,
        request: MaterializeRequest,
    ) -> Result<MaterializedAudio, ApplicationError> {
        let key = AudioKey::new(&request.voice_id, request.category, request.affirmation_id)?;
        let path = key.relative_path();
        let hash = text_hash(&request.text);

        let _lock = self.lock_key(&path).await;

        if !request.force {
            let existing = self
                .audio_repo
                .find(request.affirmation_id, key.voice_id())
                .await?;

            match existing {
                Some(record) if record.text_hash == hash => {
                    if self.storage.exists(&record.path).await {
                        tracing::debug!(path = %record.path, "Audio cache hit");
                        return Ok(self.cached(record));
                    }
                }
                Some(_) => {
                    tracing::info!(path = %path, "Affirmation text changed, regenerating audio");
                }
                None => {
                    if self.storage.exists(&path).await {
                        return self.adopt(&key, &path, &request.text, hash).await;
                    }
                }
            }
        }

        self.generate(&key, path, &request.text, hash).await
    }

    /// 音频是否已物化且与当前文本一致（不写入任何状态）
    pub async fn is_materialized(
        &self,
        affirmation_id: Uuid,
        category: Category,
        voice_id: &str,
        text: &str,
    ) -> Result<bool, ApplicationError> {
        let key = AudioKey::new(voice_id, category, affirmation_id)?;

        match self.audio_repo.find(affirmation_id, key.voice_id()).await? {
            Some(record) => {
                Ok(record.text_hash == text_hash(text) && self.storage.exists(&record.path).await)
            }
            None => Ok(self.storage.exists(&key.relative_path()).await),
        }
    }

    fn cached(&self, record: AffirmationAudioRecord) -> MaterializedAudio {
        MaterializedAudio {
            url: self.storage.url(&record.path),
            path: record.path,
            duration_ms: record.duration_ms,
            size_bytes: record.size_bytes,
            cached: true,
            characters_used: 0,
        }
    }

    /// 收编存储中已存在但没有记录的文件
    async fn adopt(
        &self,
        key: &AudioKey,
        path: &str,
        text: &str,
        hash: String,
    ) -> Result<MaterializedAudio, ApplicationError> {
        let data = self.storage.read(path).await?;
        let duration_ms = self
            .probe
            .duration_ms(&data, "mp3")
            .or_else(|| Some(estimate_duration_ms(text)));

        let record = AffirmationAudioRecord {
            affirmation_id: key.affirmation_id(),
            voice_id: key.voice_id().to_string(),
            path: path.to_string(),
            text_hash: hash,
            duration_ms,
            size_bytes: data.len() as u64,
            created_at: Utc::now(),
        };
        self.audio_repo.upsert(&record).await?;

        tracing::info!(path = %path, size = data.len(), "Adopted existing audio file");

        Ok(self.cached(record))
    }

    async fn generate(
        &self,
        key: &AudioKey,
        path: String,
        text: &str,
        hash: String,
    ) -> Result<MaterializedAudio, ApplicationError> {
        let characters = text.chars().count();

        tracing::info!(
            voice_id = %key.voice_id(),
            affirmation_id = %key.affirmation_id(),
            characters,
            "Generating affirmation audio"
        );

        let speech = self
            .tts_engine
            .synthesize(SpeechRequest {
                text: text.to_string(),
                voice_id: key.voice_id().to_string(),
            })
            .await?;

        if speech.audio_data.is_empty() {
            return Err(ApplicationError::ExternalServiceError(
                "TTS provider returned empty audio".to_string(),
            ));
        }

        let duration_ms = self
            .probe
            .duration_ms(&speech.audio_data, "mp3")
            .or_else(|| Some(estimate_duration_ms(text)));

        let stored = self.storage.save(&path, &speech.audio_data).await?;

        let record = AffirmationAudioRecord {
            affirmation_id: key.affirmation_id(),
            voice_id: key.voice_id().to_string(),
            path: stored.path.clone(),
            text_hash: hash,
            duration_ms,
            size_bytes: stored.size_bytes,
            created_at: Utc::now(),
        };
        self.audio_repo.upsert(&record).await?;

        tracing::info!(
            path = %stored.path,
            size = stored.size_bytes,
            duration_ms = ?duration_ms,
            "Affirmation audio generated"
        );

        Ok(MaterializedAudio {
            url: self.storage.url(&stored.path),
            path: stored.path,
            duration_ms,
            size_bytes: stored.size_bytes,
            cached: false,
            characters_used: characters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::{FakeTtsClient, LocalAudioStorage, SymphoniaProbe};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteAffirmationAudioRepository,
    };
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        tts: Arc<FakeTtsClient>,
        storage: Arc<LocalAudioStorage>,
        materializer: Arc<AudioMaterializer>,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let tts = Arc::new(FakeTtsClient::new());
        let storage = Arc::new(LocalAudioStorage::new(dir.path()).await.unwrap());
        let materializer = Arc::new(AudioMaterializer::new(
            tts.clone(),
            storage.clone(),
            Arc::new(SymphoniaProbe::new()),
            Arc::new(SqliteAffirmationAudioRepository::new(pool)),
        ));

        Fixture {
            _dir: dir,
            tts,
            storage,
            materializer,
        }
    }

    fn request(id: Uuid, text: &str) -> MaterializeRequest {
        MaterializeRequest {
            affirmation_id: id,
            category: Category::Sono,
            text: text.to_string(),
            voice_id: "voice_a".to_string(),
            force: false,
        }
    }

    #[tokio::test]
    async fn test_second_request_is_served_from_cache() {
        let f = fixture().await;
        let id = Uuid::new_v4();

        let first = f.materializer.materialize(request(id, "Eu durmo bem.")).await.unwrap();
        assert!(!first.cached);
        assert_eq!(first.characters_used, 13);
        assert_eq!(
            first.path,
            format!("voices/voice_a/affirmations/sono/{}.mp3", id)
        );
        assert_eq!(first.url, format!("/api/audio/file/{}", first.path));

        let second = f.materializer.materialize(request(id, "Eu durmo bem.")).await.unwrap();
        assert!(second.cached);
        assert_eq!(second.characters_used, 0);
        assert_eq!(f.tts.call_count(), 1);
    }

    #[tokio::test]
    async fn test_text_change_regenerates() {
        let f = fixture().await;
        let id = Uuid::new_v4();

        f.materializer.materialize(request(id, "Primeira versão.")).await.unwrap();
        let changed = f.materializer.materialize(request(id, "Segunda versão.")).await.unwrap();

        assert!(!changed.cached);
        assert_eq!(f.tts.call_count(), 2);
    }

    #[tokio::test]
    async fn test_force_bypasses_cache() {
        let f = fixture().await;
        let id = Uuid::new_v4();

        f.materializer.materialize(request(id, "Eu relaxo.")).await.unwrap();
        let mut forced = request(id, "Eu relaxo.");
        forced.force = true;
        let result = f.materializer.materialize(forced).await.unwrap();

        assert!(!result.cached);
        assert_eq!(f.tts.call_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_regenerates() {
        let f = fixture().await;
        let id = Uuid::new_v4();

        let first = f.materializer.materialize(request(id, "Eu relaxo.")).await.unwrap();
        f.storage.delete(&first.path).await.unwrap();

        let second = f.materializer.materialize(request(id, "Eu relaxo.")).await.unwrap();
        assert!(!second.cached);
        assert_eq!(f.tts.call_count(), 2);
    }

    #[tokio::test]
    async fn test_orphan_file_is_adopted() {
        let f = fixture().await;
        let id = Uuid::new_v4();
        let key = AudioKey::new("voice_a", Category::Sono, id).unwrap();
        f.storage.save(&key.relative_path(), b"offline audio").await.unwrap();

        let result = f.materializer.materialize(request(id, "Eu relaxo.")).await.unwrap();
        assert!(result.cached);
        assert_eq!(result.size_bytes, 13);
        assert_eq!(f.tts.call_count(), 0);

        assert!(f
            .materializer
            .is_materialized(id, Category::Sono, "voice_a", "Eu relaxo.")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_requests_call_provider_once() {
        let f = fixture().await;
        let id = Uuid::new_v4();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let materializer = f.materializer.clone();
            handles.push(tokio::spawn(async move {
                materializer.materialize(request(id, "Eu sou suficiente.")).await
            }));
        }

        let mut generated = 0;
        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            if !result.cached {
                generated += 1;
            }
        }

        assert_eq!(generated, 1);
        assert_eq!(f.tts.call_count(), 1);
        assert_eq!(f.materializer.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_voice_id_is_rejected() {
        let f = fixture().await;
        let mut req = request(Uuid::new_v4(), "Eu relaxo.");
        req.voice_id = "../../etc".to_string();

        let err = f.materializer.materialize(req).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert_eq!(f.tts.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_nothing_behind() {
        let f = fixture().await;
        let id = Uuid::new_v4();
        f.tts.fail_on("Falha.");

        assert!(f.materializer.materialize(request(id, "Falha.")).await.is_err());
        assert!(!f
            .materializer
            .is_materialized(id, Category::Sono, "voice_a", "Falha.")
            .await
            .unwrap());
        assert_eq!(f.materializer.in_flight_count(), 0);
    }
}
