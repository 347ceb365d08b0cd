//! Account Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("无效的邮箱地址: {0}")]
    InvalidEmail(String),

    #[error("密码长度至少 {0} 个字符")]
    PasswordTooShort(usize),

    #[error("{field} 超出范围: 允许 {min}..={max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}
