//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod affirmation_handlers;
pub(crate) mod audio_handlers;
mod config_handlers;
mod generate_handlers;
mod user_handlers;

pub use affirmation_handlers::*;
pub use audio_handlers::*;
pub use config_handlers::*;
pub use generate_handlers::*;
pub use user_handlers::*;
