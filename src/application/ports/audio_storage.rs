//! Audio Storage Port - 出站端口
//!
//! 音频文件按存储根目录下的相对路径寻址

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 音频存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 已写入的音频
#[derive(Debug, Clone)]
pub struct StoredAudio {
    /// 相对路径
    pub path: String,
    pub size_bytes: u64,
}

/// Audio Storage Port
#[async_trait]
pub trait AudioStoragePort: Send + Sync {
    /// 解析为绝对路径（拒绝越界路径）
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError>;

    /// 对外访问 URL
    fn url(&self, path: &str) -> String {
        format!("/api/audio/file/{}", path.trim_start_matches('/'))
    }

    /// 原子写入（临时文件 + rename）
    async fn save(&self, path: &str, data: &[u8]) -> Result<StoredAudio, StorageError>;

    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    async fn exists(&self, path: &str) -> bool;

    /// 删除文件，返回文件是否存在
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;
}
