//! HTTP Handlers

mod affirmations;
mod audio;
mod auth;
mod categories;
mod config;
mod generate;
mod health;
mod voices;

pub use affirmations::*;
pub use audio::*;
pub use auth::*;
pub use categories::*;
pub use config::*;
pub use generate::*;
pub use health::*;
pub use voices::*;

use uuid::Uuid;

use crate::infrastructure::http::error::ApiError;

/// 解析路径中的 ID，非法 ID 视为不存在
fn parse_id(raw: &str, resource: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("{} not found: {}", resource, raw)))
}
