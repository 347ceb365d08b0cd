//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 开发环境默认密钥（生产环境禁止使用）
pub const DEV_SECRET_KEY: &str = "dev-secret-key";
pub const DEV_JWT_SECRET: &str = "dev-jwt-secret";

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 运行环境（development / production）
    #[serde(default = "default_env")]
    pub env: String,

    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// TTS 服务商配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 认证配置
    #[serde(default)]
    pub auth: AuthConfig,

    /// 音频生成配置
    #[serde(default)]
    pub generation: GenerationConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,

    /// 旧部署遗留的 MongoDB 连接串，仅记录，不使用
    #[serde(default)]
    pub mongodb_uri: Option<String>,
}

fn default_env() -> String {
    "development".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: default_env(),
            server: ServerConfig::default(),
            tts: TtsConfig::default(),
            database: DatabaseConfig::default(),
            storage: StorageConfig::default(),
            auth: AuthConfig::default(),
            generation: GenerationConfig::default(),
            log: LogConfig::default(),
            mongodb_uri: None,
        }
    }
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// ElevenLabs 配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// API Key，未设置时服务商视为未配置
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_tts_base_url")]
    pub base_url: String,

    #[serde(default = "default_tts_model")]
    pub model_id: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 最大重试次数
    #[serde(default = "default_tts_retries")]
    pub max_retries: u32,

    /// 线性退避基数（毫秒）
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

fn default_tts_base_url() -> String {
    "https://api.elevenlabs.io/v1".to_string()
}

fn default_tts_model() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_tts_timeout() -> u64 {
    120
}

fn default_tts_retries() -> u32 {
    2
}

fn default_retry_backoff() -> u64 {
    1000
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_tts_base_url(),
            model_id: default_tts_model(),
            timeout_secs: default_tts_timeout(),
            max_retries: default_tts_retries(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/hypnos.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 存储类型，目前只支持 local
    #[serde(default = "default_storage_kind")]
    pub kind: String,

    /// 音频存储根目录
    #[serde(default = "default_local_path")]
    pub local_path: PathBuf,

    /// 上传文件最大大小（字节），默认 10MB
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

fn default_storage_kind() -> String {
    "local".to_string()
}

fn default_local_path() -> PathBuf {
    PathBuf::from("storage/audio")
}

fn default_max_upload_size() -> usize {
    10 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: default_storage_kind(),
            local_path: default_local_path(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 认证配置
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// JWT 签名密钥 (HS256)
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: u64,

    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_secs: u64,
}

fn default_secret_key() -> String {
    DEV_SECRET_KEY.to_string()
}

fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.to_string()
}

fn default_access_ttl() -> u64 {
    3600
}

fn default_refresh_ttl() -> u64 {
    2_592_000
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: default_secret_key(),
            jwt_secret: default_jwt_secret(),
            access_token_ttl_secs: default_access_ttl(),
            refresh_token_ttl_secs: default_refresh_ttl(),
        }
    }
}

/// 音频生成配置
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// 批量生成的并发上限
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// 限流后的退避时间（秒，CLI 预生成使用）
    #[serde(default = "default_rate_limit_backoff")]
    pub rate_limit_backoff_secs: u64,
}

fn default_max_concurrent() -> usize {
    2
}

fn default_rate_limit_backoff() -> u64 {
    30
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            rate_limit_backoff_secs: default_rate_limit_backoff(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否输出 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
