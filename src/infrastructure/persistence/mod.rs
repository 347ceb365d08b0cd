//! Persistence Layer - 数据持久化
//!
//! SQLite 存储实现与初始数据

mod seed;
pub mod sqlite;

pub use seed::{seed_catalog, SeedReport, DEFAULT_VOICE_ID};
