//! Account Context - 账户限界上下文
//!
//! 职责:
//! - 邮箱 / 密码规则
//! - 订阅计划
//! - 播放偏好（双耳节拍、音量、间隔）

mod errors;
mod preferences;
mod value_objects;

pub use errors::AccountError;
pub use preferences::{UserPreferences, UserPreferencesPatch};
pub use value_objects::{Email, Password, Plan, MIN_PASSWORD_LEN};
