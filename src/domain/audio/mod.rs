//! Audio Context - 音频限界上下文
//!
//! 职责:
//! - (voice_id, category, affirmation_id) 音频寻址
//! - 存储相对路径的安全校验
//! - 音频格式与来源

mod audio_key;
mod errors;
mod value_objects;

pub use audio_key::{sanitize_relative_path, validate_voice_id, AudioKey};
pub use errors::AudioError;
pub use value_objects::{AudioFormat, AudioSource};
