//! Affirmation Context - 肯定语限界上下文
//!
//! 职责:
//! - 固定的五个分类
//! - 系统默认肯定语（每个分类 20 条）
//! - 文本校验、字符计数与时长估算

mod catalog;
mod category;
mod errors;
mod text;

pub use catalog::{default_affirmations, AFFIRMATIONS_PER_CATEGORY};
pub use category::Category;
pub use errors::AffirmationError;
pub use text::{estimate_duration_ms, fold_accents, text_hash, AffirmationText, MAX_TEXT_CHARS};
