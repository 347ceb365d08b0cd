//! Audio Context - Value Objects

use serde::{Deserialize, Serialize};

use super::AudioError;

/// 音频格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Webm,
    Mp4,
    M4a,
    Wav,
    Ogg,
}

impl AudioFormat {
    /// 允许用户上传的格式
    pub const UPLOADABLE: [AudioFormat; 6] = [
        AudioFormat::Webm,
        AudioFormat::Mp3,
        AudioFormat::Mp4,
        AudioFormat::M4a,
        AudioFormat::Wav,
        AudioFormat::Ogg,
    ];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "webm" => Some(Self::Webm),
            "mp4" => Some(Self::Mp4),
            "m4a" => Some(Self::M4a),
            "wav" => Some(Self::Wav),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    /// 从文件名解析格式
    pub fn from_filename(filename: &str) -> Result<Self, AudioError> {
        filename
            .rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
            .ok_or_else(|| AudioError::UnsupportedFormat(filename.to_string()))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
            Self::M4a => "m4a",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Webm => "audio/webm",
            Self::Mp4 | Self::M4a => "audio/mp4",
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
        }
    }

    /// 根据文件扩展名推断 Content-Type，未知时按 MP3 处理
    pub fn mime_for_path(path: &str) -> &'static str {
        path.rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
            .unwrap_or(Self::Mp3)
            .mime_type()
    }
}

/// 用户肯定语的音频来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioSource {
    /// 系统默认音频
    #[default]
    System,
    /// TTS 生成
    Elevenlabs,
    /// 用户录音
    Recorded,
}

impl AudioSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioSource::System => "system",
            AudioSource::Elevenlabs => "elevenlabs",
            AudioSource::Recorded => "recorded",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "system" => Some(AudioSource::System),
            "elevenlabs" => Some(AudioSource::Elevenlabs),
            "recorded" => Some(AudioSource::Recorded),
            _ => None,
        }
    }
}
