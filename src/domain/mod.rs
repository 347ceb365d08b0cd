//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Affirmation Context: 分类、系统默认肯定语、文本规则
//! - Audio Context: 音频寻址与格式
//! - Account Context: 用户、订阅计划、播放偏好

pub mod account;
pub mod affirmation;
pub mod audio;

pub use account::{AccountError, Email, Password, Plan, UserPreferences, UserPreferencesPatch};
pub use affirmation::{
    default_affirmations, estimate_duration_ms, text_hash, AffirmationError, AffirmationText,
    Category, MAX_TEXT_CHARS,
};
pub use audio::{
    sanitize_relative_path, validate_voice_id, AudioError, AudioFormat, AudioKey, AudioSource,
};
