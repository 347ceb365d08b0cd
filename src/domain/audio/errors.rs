//! Audio Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("无效的音色 ID: {0}")]
    InvalidVoiceId(String),

    #[error("无效的存储路径: {0}")]
    InvalidPath(String),

    #[error("不支持的音频格式: {0}")]
    UnsupportedFormat(String),
}
