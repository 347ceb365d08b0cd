//! SQLite Persistence - SQLite 数据库持久化实现

mod affirmation_audio_repo;
mod catalog_repo;
mod database;
mod user_affirmation_repo;
mod user_config_repo;
pub(crate) mod user_repo;
mod voice_repo;

pub use affirmation_audio_repo::*;
pub use catalog_repo::*;
pub use database::*;
pub use user_affirmation_repo::*;
pub use user_config_repo::*;
pub use user_repo::SqliteUserRepository;
pub use voice_repo::*;
