//! Query Handlers 实现

mod audio_handlers;
mod catalog_handlers;
mod usage_handlers;
mod user_handlers;
mod voice_handlers;

pub use audio_handlers::*;
pub use catalog_handlers::*;
pub use usage_handlers::*;
pub use user_handlers::*;
pub use voice_handlers::*;
