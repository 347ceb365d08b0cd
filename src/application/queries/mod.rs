//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod audio_queries;
mod catalog_queries;
mod usage_queries;
mod user_queries;
mod voice_queries;

pub mod handlers;

pub use audio_queries::*;
pub use catalog_queries::*;
pub use usage_queries::*;
pub use user_queries::*;
pub use voice_queries::*;
