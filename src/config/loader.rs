//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 部署遗留的环境变量（`SECRET_KEY`、`ELEVENLABS_API_KEY` 等）
//! 2. 带前缀的环境变量（`HYPNOS_`）
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{
    builder::DefaultState, Config, ConfigBuilder, ConfigError as ConfigCrateError, Environment,
    File,
};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, DEV_JWT_SECRET, DEV_SECRET_KEY};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 不带前缀的环境变量 → 配置键
const BARE_ENV_KEYS: &[(&str, &str)] = &[
    ("SECRET_KEY", "auth.secret_key"),
    ("JWT_SECRET_KEY", "auth.jwt_secret"),
    ("JWT_ACCESS_TOKEN_EXPIRES", "auth.access_token_ttl_secs"),
    ("JWT_REFRESH_TOKEN_EXPIRES", "auth.refresh_token_ttl_secs"),
    ("MONGODB_URI", "mongodb_uri"),
    ("STORAGE_TYPE", "storage.kind"),
    ("STORAGE_LOCAL_PATH", "storage.local_path"),
    ("ELEVENLABS_API_KEY", "tts.api_key"),
];

/// 加载应用配置
///
/// # 环境变量示例
/// - `HYPNOS_SERVER__PORT=8080`
/// - `HYPNOS_GENERATION__MAX_CONCURRENT=4`
/// - `HYPNOS_ENV=production`
/// - `ELEVENLABS_API_KEY=...`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// `config_path` 为 None 时搜索当前目录下的 config.toml / config.local.toml
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 前缀: HYPNOS_，层级分隔符: __
    builder = builder.add_source(
        Environment::with_prefix("HYPNOS")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let builder = apply_bare_env(builder, |name| std::env::var(name).ok())?;
    build_config(builder)
}

/// 用不带前缀的环境变量覆盖对应配置键
fn apply_bare_env<F>(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: F,
) -> Result<ConfigBuilder<DefaultState>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for (name, key) in BARE_ENV_KEYS {
        let value = lookup(name).filter(|v| !v.trim().is_empty());
        builder = builder.set_override_option(*key, value)?;
    }
    Ok(builder)
}

fn build_config(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, ConfigError> {
    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if !config.storage.kind.eq_ignore_ascii_case("local") {
        return Err(ConfigError::ValidationError(format!(
            "Unsupported storage type '{}', only 'local' is available",
            config.storage.kind
        )));
    }

    if config.generation.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "generation.max_concurrent must be at least 1".to_string(),
        ));
    }

    if config.auth.jwt_secret.is_empty() {
        return Err(ConfigError::ValidationError(
            "JWT secret cannot be empty".to_string(),
        ));
    }

    if config.is_production()
        && (config.auth.secret_key == DEV_SECRET_KEY || config.auth.jwt_secret == DEV_JWT_SECRET)
    {
        return Err(ConfigError::ValidationError(
            "Development secrets are not allowed in production; set SECRET_KEY and JWT_SECRET_KEY"
                .to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Environment: {}", config.env);
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Storage: {} ({:?})", config.storage.kind, config.storage.local_path);
    tracing::info!("Max Upload Size: {} bytes", config.storage.max_upload_size);
    tracing::info!("TTS Base URL: {}", config.tts.base_url);
    tracing::info!("TTS Model: {}", config.tts.model_id);
    tracing::info!(
        "TTS API Key: {}",
        if config.tts.api_key.is_some() { "set" } else { "not set" }
    );
    tracing::info!("Generation Max Concurrent: {}", config.generation.max_concurrent);
    tracing::info!("Log Level: {}", config.log.level);
    if config.mongodb_uri.is_some() {
        tracing::warn!("MONGODB_URI is set but ignored; data is stored in SQLite");
    }
    tracing::info!("=================================");
}
