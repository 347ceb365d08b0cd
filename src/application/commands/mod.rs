//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod affirmation_commands;
mod audio_commands;
mod config_commands;
mod generate_commands;
mod user_commands;

pub mod handlers;

pub use affirmation_commands::*;
pub use audio_commands::*;
pub use config_commands::*;
pub use generate_commands::*;
pub use user_commands::*;
