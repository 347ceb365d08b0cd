//! SQLite Database - 数据库连接和迁移

use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use crate::application::ports::RepositoryError;

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    pub database_url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./data/hypnos.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }
}

/// 数据库连接池
pub type DbPool = Pool<Sqlite>;

/// 创建数据库连接池
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    // 启用 WAL 模式，允许并发读写
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await?;

    // 遇到锁时等待而不是立即失败
    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA synchronous=NORMAL")
        .execute(&pool)
        .await?;

    tracing::info!("SQLite pool created with WAL mode and busy_timeout=5000ms");

    Ok(pool)
}

/// 运行数据库迁移
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    // users 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            plan TEXT NOT NULL DEFAULT 'free',
            elevenlabs_voice_id TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // user_configs 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_configs (
            user_id TEXT PRIMARY KEY,
            binaural_base_freq INTEGER NOT NULL DEFAULT 200,
            binaural_beat_freq INTEGER NOT NULL DEFAULT 10,
            binaural_volume REAL NOT NULL DEFAULT 0.5,
            voice_volume REAL NOT NULL DEFAULT 0.8,
            gap_between_sec INTEGER NOT NULL DEFAULT 2,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // categories 表
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            sort_order INTEGER NOT NULL,
            is_system INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;

    // affirmations 表（系统默认）
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS affirmations (
            id TEXT PRIMARY KEY,
            category_id TEXT NOT NULL,
            text TEXT NOT NULL,
            sort_order INTEGER NOT NULL,
            FOREIGN KEY (category_id) REFERENCES categories(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // affirmation_audio 表：已生成的音频
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS affirmation_audio (
            affirmation_id TEXT NOT NULL,
            voice_id TEXT NOT NULL,
            path TEXT NOT NULL,
            text_hash TEXT NOT NULL,
            duration_ms INTEGER,
            size_bytes INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            PRIMARY KEY (affirmation_id, voice_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // voices 表：已配置的 TTS 音色
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS voices (
            id TEXT PRIMARY KEY,
            provider_voice_id TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL,
            name TEXT NOT NULL,
            display_name TEXT NOT NULL,
            gender TEXT NOT NULL,
            is_default INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            sort_order INTEGER NOT NULL DEFAULT 0,
            preview_url TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // user_affirmations 表：覆盖层与自定义肯定语
    // affirmation_id 为 NULL 的行（自定义）不参与唯一约束
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_affirmations (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            affirmation_id TEXT,
            category_id TEXT NOT NULL,
            custom_text TEXT,
            enabled INTEGER NOT NULL DEFAULT 1,
            sort_order INTEGER,
            audio_path TEXT,
            audio_source TEXT NOT NULL DEFAULT 'system',
            audio_duration_ms INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            UNIQUE (user_id, affirmation_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 创建索引
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_affirmations_category_id
        ON affirmations(category_id)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_affirmation_audio_voice_id
        ON affirmation_audio(voice_id)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_user_affirmations_user_id
        ON user_affirmations(user_id)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed");
    Ok(())
}

/// sqlx 错误映射，唯一约束冲突映射为 Duplicate
pub(crate) fn db_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Duplicate(db.message().to_string())
        }
        _ => RepositoryError::DatabaseError(err.to_string()),
    }
}

pub(crate) fn parse_uuid(value: &str) -> Result<uuid::Uuid, RepositoryError> {
    uuid::Uuid::parse_str(value).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

pub(crate) fn parse_time(value: &str) -> Result<chrono::DateTime<chrono::Utc>, RepositoryError> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&chrono::Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}
