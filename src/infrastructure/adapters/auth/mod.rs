//! Auth Adapters - JWT 令牌与 Argon2 密码哈希

mod argon2_hasher;
mod jwt_token_service;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_token_service::{JwtTokenService, JwtTokenServiceConfig};
