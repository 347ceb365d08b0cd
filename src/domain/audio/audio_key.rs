//! Audio Context - AudioKey
//!
//! 生成音频按 (voice_id, category, affirmation_id) 寻址：
//! `voices/{voice_id}/affirmations/{category}/{affirmation_id}.mp3`

use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

use super::AudioError;
use crate::domain::affirmation::Category;

/// 音色 ID 最大长度
const MAX_VOICE_ID_LEN: usize = 64;

/// 校验音色 ID（去除首尾空白），只允许 `[A-Za-z0-9_-]`，最长 64
pub fn validate_voice_id(voice_id: &str) -> Result<&str, AudioError> {
    let voice_id = voice_id.trim();
    let valid = !voice_id.is_empty()
        && voice_id.len() <= MAX_VOICE_ID_LEN
        && voice_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(voice_id)
    } else {
        Err(AudioError::InvalidVoiceId(voice_id.to_string()))
    }
}

/// 生成音频的地址
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioKey {
    voice_id: String,
    category: Category,
    affirmation_id: Uuid,
}

impl AudioKey {
    /// 创建地址
    ///
    /// voice_id 会成为路径组件，见 [`validate_voice_id`]
    pub fn new(
        voice_id: impl Into<String>,
        category: Category,
        affirmation_id: Uuid,
    ) -> Result<Self, AudioError> {
        let voice_id: String = voice_id.into();
        let voice_id = validate_voice_id(&voice_id)?.to_string();

        Ok(Self {
            voice_id,
            category,
            affirmation_id,
        })
    }

    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn affirmation_id(&self) -> Uuid {
        self.affirmation_id
    }

    /// 存储根目录下的相对路径
    pub fn relative_path(&self) -> String {
        format!(
            "voices/{}/affirmations/{}/{}.mp3",
            self.voice_id,
            self.category.slug(),
            self.affirmation_id
        )
    }
}

impl std::fmt::Display for AudioKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.relative_path())
    }
}

/// 校验并规范化存储相对路径
///
/// 拒绝空路径、绝对路径以及包含 `..` 的路径
pub fn sanitize_relative_path(path: &str) -> Result<PathBuf, AudioError> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(AudioError::InvalidPath(path.to_string()));
    }

    let mut clean = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => return Err(AudioError::InvalidPath(path.to_string())),
        }
    }

    if clean.as_os_str().is_empty() {
        return Err(AudioError::InvalidPath(path.to_string()));
    }
    Ok(clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_layout() {
        let id = Uuid::parse_str("2f1c8a7e-9a53-4f55-9d4e-0c2b8f1e6d10").unwrap();
        let key = AudioKey::new("fCxG8OHm4STbIsWe4aT9", Category::Saude, id).unwrap();
        assert_eq!(
            key.relative_path(),
            "voices/fCxG8OHm4STbIsWe4aT9/affirmations/saude/2f1c8a7e-9a53-4f55-9d4e-0c2b8f1e6d10.mp3"
        );
    }

    #[test]
    fn test_rejects_unsafe_voice_ids() {
        let id = Uuid::new_v4();
        let long = "x".repeat(65);
        for bad in ["", "  ", "../etc", "a/b", "voice id", long.as_str()] {
            assert!(
                AudioKey::new(bad, Category::Sono, id).is_err(),
                "accepted {:?}",
                bad
            );
        }
        assert!(AudioKey::new("voice_01-A", Category::Sono, id).is_ok());
    }

    #[test]
    fn test_validate_voice_id_trims() {
        assert_eq!(validate_voice_id("  abc_1 ").unwrap(), "abc_1");
        assert!(matches!(
            validate_voice_id("../user"),
            Err(AudioError::InvalidVoiceId(_))
        ));
    }

    #[test]
    fn test_sanitize_relative_path() {
        assert_eq!(
            sanitize_relative_path("voices/a/b.mp3").unwrap(),
            PathBuf::from("voices/a/b.mp3")
        );
        assert_eq!(
            sanitize_relative_path("/uploads/./x.webm").unwrap(),
            PathBuf::from("uploads/x.webm")
        );
        assert!(sanitize_relative_path("").is_err());
        assert!(sanitize_relative_path("../secret").is_err());
        assert!(sanitize_relative_path("voices/../../secret").is_err());
    }
}
