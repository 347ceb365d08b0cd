//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod auth;
pub mod probe;
pub mod storage;
pub mod tts;

pub use auth::*;
pub use probe::*;
pub use storage::*;
pub use tts::*;
