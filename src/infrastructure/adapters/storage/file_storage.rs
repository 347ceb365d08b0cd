//! File Storage - 本地文件系统音频存储
//!
//! 实现 AudioStoragePort trait，所有路径都相对于存储根目录

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{AudioStoragePort, StorageError, StoredAudio};
use crate::domain::sanitize_relative_path;

/// 本地文件系统音频存储
pub struct LocalAudioStorage {
    /// 存储根目录
    base_dir: PathBuf,
}

impl LocalAudioStorage {
    /// 创建存储，确保根目录存在
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl AudioStoragePort for LocalAudioStorage {
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = sanitize_relative_path(path)
            .map_err(|_| StorageError::InvalidPath(path.to_string()))?;
        Ok(self.base_dir.join(relative))
    }

    async fn save(&self, path: &str, data: &[u8]) -> Result<StoredAudio, StorageError> {
        let full_path = self.resolve(path)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::IoError(e.to_string()))?;
        }

        // 先写临时文件再 rename，读者不会看到写了一半的文件
        let file_name = full_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StorageError::InvalidPath(path.to_string()))?;
        let tmp_path = full_path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        if let Err(e) = fs::write(&tmp_path, data).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StorageError::IoError(e.to_string()));
        }
        if let Err(e) = fs::rename(&tmp_path, &full_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StorageError::IoError(e.to_string()));
        }

        tracing::debug!(path = %path, size = data.len(), "Saved audio file");

        Ok(StoredAudio {
            path: path.trim_start_matches('/').to_string(),
            size_bytes: data.len() as u64,
        })
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full_path = self.resolve(path)?;

        match fs::read(&full_path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::FileNotFound(path.to_string()))
            }
            Err(e) => Err(StorageError::IoError(e.to_string())),
        }
    }

    async fn exists(&self, path: &str) -> bool {
        match self.resolve(path) {
            Ok(full_path) => fs::metadata(&full_path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let full_path = self.resolve(path)?;

        match fs::remove_file(&full_path).await {
            Ok(()) => {
                tracing::debug!(path = %path, "Deleted audio file");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_and_read_audio() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalAudioStorage::new(temp_dir.path()).await.unwrap();

        let path = "voices/abc/affirmations/sono/1.mp3";
        let data = b"fake mp3 data";

        let stored = storage.save(path, data).await.unwrap();
        assert_eq!(stored.path, path);
        assert_eq!(stored.size_bytes, data.len() as u64);
        assert!(temp_dir.path().join(path).is_file());

        assert_eq!(storage.read(path).await.unwrap(), data);
        assert!(storage.exists(path).await);

        assert!(storage.delete(path).await.unwrap());
        assert!(!storage.exists(path).await);
        assert!(!storage.delete(path).await.unwrap());
    }

    #[tokio::test]
    async fn test_overwrite_leaves_no_temp_files() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalAudioStorage::new(temp_dir.path()).await.unwrap();

        let path = "uploads/u1/take.webm";
        storage.save(path, b"first").await.unwrap();
        storage.save(path, b"second").await.unwrap();

        assert_eq!(storage.read(path).await.unwrap(), b"second");

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path().join("uploads/u1"))
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalAudioStorage::new(temp_dir.path()).await.unwrap();

        assert!(matches!(
            storage.save("../escape.mp3", b"x").await,
            Err(StorageError::InvalidPath(_))
        ));
        assert!(storage.resolve("voices/../../etc/passwd").is_err());
        assert!(!storage.exists("../escape.mp3").await);
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let temp_dir = tempdir().unwrap();
        let storage = LocalAudioStorage::new(temp_dir.path()).await.unwrap();

        assert!(matches!(
            storage.read("voices/none.mp3").await,
            Err(StorageError::FileNotFound(_))
        ));
        assert_eq!(storage.url("voices/a.mp3"), "/api/audio/file/voices/a.mp3");
    }
}
