//! 测试夹具：内存 SQLite + 临时目录存储 + Fake TTS

use chrono::Utc;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

use crate::application::ports::{
    AffirmationAudioRepositoryPort, AffirmationRepositoryPort, CategoryRepositoryPort,
    PasswordHasherPort, UserAffirmationRepositoryPort, UserConfigRepositoryPort, UserRecord,
    UserRepositoryPort, VoiceRepositoryPort,
};
use crate::application::{AudioMaterializer, TargetResolver};
use crate::domain::Plan;
use crate::infrastructure::adapters::{
    Argon2PasswordHasher, FakeTtsClient, FakeTtsClientConfig, JwtTokenService,
    JwtTokenServiceConfig, LocalAudioStorage, SymphoniaProbe,
};
use crate::infrastructure::http::AppPorts;
use crate::infrastructure::persistence::seed_catalog;
use crate::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, DbPool, SqliteAffirmationAudioRepository,
    SqliteAffirmationRepository, SqliteCategoryRepository, SqliteUserAffirmationRepository,
    SqliteUserConfigRepository, SqliteUserRepository, SqliteVoiceRepository,
};

/// 测试用户的统一密码
pub const TEST_PASSWORD: &str = "segredo123";

pub struct TestContext {
    pub pool: DbPool,
    pub users: Arc<dyn UserRepositoryPort>,
    pub user_configs: Arc<dyn UserConfigRepositoryPort>,
    pub categories: Arc<dyn CategoryRepositoryPort>,
    pub affirmations: Arc<dyn AffirmationRepositoryPort>,
    pub audio_repo: Arc<dyn AffirmationAudioRepositoryPort>,
    pub voices: Arc<dyn VoiceRepositoryPort>,
    pub user_affirmations: Arc<dyn UserAffirmationRepositoryPort>,
    pub tts: Arc<FakeTtsClient>,
    pub storage: Arc<LocalAudioStorage>,
    pub probe: Arc<SymphoniaProbe>,
    pub hasher: Arc<Argon2PasswordHasher>,
    pub tokens: Arc<JwtTokenService>,
    pub materializer: Arc<AudioMaterializer>,
    _dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_tts(FakeTtsClientConfig {
            latency: std::time::Duration::from_millis(5),
            ..Default::default()
        })
        .await
    }

    pub async fn with_tts(config: FakeTtsClientConfig) -> Self {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalAudioStorage::new(dir.path().join("audio")).await.unwrap());

        let users: Arc<dyn UserRepositoryPort> = Arc::new(SqliteUserRepository::new(pool.clone()));
        let user_configs: Arc<dyn UserConfigRepositoryPort> =
            Arc::new(SqliteUserConfigRepository::new(pool.clone()));
        let categories: Arc<dyn CategoryRepositoryPort> =
            Arc::new(SqliteCategoryRepository::new(pool.clone()));
        let affirmations: Arc<dyn AffirmationRepositoryPort> =
            Arc::new(SqliteAffirmationRepository::new(pool.clone()));
        let audio_repo: Arc<dyn AffirmationAudioRepositoryPort> =
            Arc::new(SqliteAffirmationAudioRepository::new(pool.clone()));
        let voices: Arc<dyn VoiceRepositoryPort> =
            Arc::new(SqliteVoiceRepository::new(pool.clone()));
        let user_affirmations: Arc<dyn UserAffirmationRepositoryPort> =
            Arc::new(SqliteUserAffirmationRepository::new(pool.clone()));

        seed_catalog(categories.as_ref(), affirmations.as_ref(), voices.as_ref())
            .await
            .unwrap();

        let tts = Arc::new(FakeTtsClient::with_config(config));
        let probe = Arc::new(SymphoniaProbe::new());
        let materializer = Arc::new(AudioMaterializer::new(
            tts.clone(),
            storage.clone(),
            probe.clone(),
            audio_repo.clone(),
        ));

        Self {
            pool,
            users,
            user_configs,
            categories,
            affirmations,
            audio_repo,
            voices,
            user_affirmations,
            tts,
            storage,
            probe,
            hasher: Arc::new(Argon2PasswordHasher::with_cost(1024, 1).unwrap()),
            tokens: Arc::new(JwtTokenService::new(JwtTokenServiceConfig::default())),
            materializer,
            _dir: dir,
        }
    }

    pub fn resolver(&self) -> TargetResolver {
        TargetResolver::new(
            self.affirmations.clone(),
            self.categories.clone(),
            self.user_affirmations.clone(),
        )
    }

    pub fn ports(&self) -> AppPorts {
        AppPorts {
            users: self.users.clone(),
            user_configs: self.user_configs.clone(),
            categories: self.categories.clone(),
            affirmations: self.affirmations.clone(),
            audio_repo: self.audio_repo.clone(),
            voices: self.voices.clone(),
            user_affirmations: self.user_affirmations.clone(),
            tts_engine: self.tts.clone(),
            storage: self.storage.clone(),
            probe: self.probe.clone(),
            hasher: self.hasher.clone(),
            tokens: self.tokens.clone(),
        }
    }

    /// 创建用户，密码为 [`TEST_PASSWORD`]
    pub async fn create_user(&self, email: &str, plan: Plan) -> UserRecord {
        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: self.hasher.hash(TEST_PASSWORD).unwrap(),
            plan,
            elevenlabs_voice_id: None,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await.unwrap();
        user
    }
}
