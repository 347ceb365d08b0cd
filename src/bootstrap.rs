//! 组装端口实现（HTTP 服务与 CLI 共用）

use std::sync::Arc;

use hypnos::config::AppConfig;
use hypnos::infrastructure::adapters::{
    Argon2PasswordHasher, ElevenLabsClient, ElevenLabsClientConfig, JwtTokenService,
    JwtTokenServiceConfig, LocalAudioStorage, SymphoniaProbe, VoiceSettings,
};
use hypnos::infrastructure::http::AppPorts;
use hypnos::infrastructure::persistence::seed_catalog;
use hypnos::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteAffirmationAudioRepository,
    SqliteAffirmationRepository, SqliteCategoryRepository, SqliteUserAffirmationRepository,
    SqliteUserConfigRepository, SqliteUserRepository, SqliteVoiceRepository,
};

/// 初始化数据库、存储与 TTS 客户端
pub async fn build_ports(config: &AppConfig) -> anyhow::Result<AppPorts> {
    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let users = Arc::new(SqliteUserRepository::new(pool.clone()));
    let user_configs = Arc::new(SqliteUserConfigRepository::new(pool.clone()));
    let categories = Arc::new(SqliteCategoryRepository::new(pool.clone()));
    let affirmations = Arc::new(SqliteAffirmationRepository::new(pool.clone()));
    let audio_repo = Arc::new(SqliteAffirmationAudioRepository::new(pool.clone()));
    let voices = Arc::new(SqliteVoiceRepository::new(pool.clone()));
    let user_affirmations = Arc::new(SqliteUserAffirmationRepository::new(pool.clone()));

    let seeded = seed_catalog(categories.as_ref(), affirmations.as_ref(), voices.as_ref()).await?;
    tracing::info!(
        categories = seeded.categories,
        affirmations = seeded.affirmations,
        voices = seeded.voices,
        "Catalog seed checked"
    );

    let storage = Arc::new(LocalAudioStorage::new(&config.storage.local_path).await?);

    let tts_config = ElevenLabsClientConfig {
        api_key: config.tts.api_key.clone(),
        base_url: config.tts.base_url.clone(),
        model_id: config.tts.model_id.clone(),
        voice_settings: VoiceSettings::default(),
        timeout_secs: config.tts.timeout_secs,
        max_retries: config.tts.max_retries,
        retry_backoff_ms: config.tts.retry_backoff_ms,
    };
    let tts_engine = Arc::new(ElevenLabsClient::new(tts_config)?);
    if config.tts.api_key.is_none() {
        tracing::warn!("ELEVENLABS_API_KEY not set, audio generation is disabled");
    }

    let tokens = Arc::new(JwtTokenService::new(JwtTokenServiceConfig {
        secret: config.auth.jwt_secret.clone(),
        access_ttl_secs: config.auth.access_token_ttl_secs,
        refresh_ttl_secs: config.auth.refresh_token_ttl_secs,
    }));

    Ok(AppPorts {
        users,
        user_configs,
        categories,
        affirmations,
        audio_repo,
        voices,
        user_affirmations,
        tts_engine,
        storage,
        probe: Arc::new(SymphoniaProbe::new()),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        tokens,
    })
}
