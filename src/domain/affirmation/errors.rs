//! Affirmation Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AffirmationError {
    #[error("肯定语文本不能为空")]
    EmptyText,

    #[error("肯定语文本过长: {0} 字符（最多 {1}）")]
    TextTooLong(usize, usize),

    #[error("无效的排序值: {0}")]
    InvalidOrder(i64),

    #[error("未知分类: {0}")]
    UnknownCategory(String),
}
