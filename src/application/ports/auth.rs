//! Auth Ports - 令牌签发与密码哈希

use thiserror::Error;
use uuid::Uuid;

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    Expired,

    #[error("Wrong token type: expected {expected}")]
    WrongKind { expected: &'static str },

    #[error("Password hashing failed: {0}")]
    HashError(String),
}

/// 令牌类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Token Service Port
pub trait TokenServicePort: Send + Sync {
    /// 为用户签发指定类型的令牌
    fn issue(&self, user_id: Uuid, kind: TokenKind) -> Result<String, AuthError>;

    /// 校验令牌并返回用户 ID，类型不符时拒绝
    fn verify(&self, token: &str, expected: TokenKind) -> Result<Uuid, AuthError>;
}

/// Password Hasher Port
pub trait PasswordHasherPort: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}
