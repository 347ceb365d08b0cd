//! Hypnos - 肯定语语音合成服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Affirmation Context: 分类、默认肯定语、文本规则
//! - Audio Context: 音频寻址与格式
//! - Account Context: 用户、订阅计划、播放偏好
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TtsEngine, AudioStorage, AudioProbe, Auth, Repositories）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Persistence: SQLite 存储与初始数据
//! - Adapters: ElevenLabs Client, 本地文件存储, 音频探测, 鉴权

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
mod test_support;

pub use config::{load_config, AppConfig};
