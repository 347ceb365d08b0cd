//! User Commands - 注册、登录与订阅计划

use crate::domain::Plan;

/// 注册
#[derive(Debug, Clone)]
pub struct Register {
    pub email: String,
    pub password: String,
}

/// 登录
#[derive(Debug, Clone)]
pub struct Login {
    pub email: String,
    pub password: String,
}

/// 用 refresh token 换取新的 access token
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub refresh_token: String,
}

/// 修改用户订阅计划（运维命令）
#[derive(Debug, Clone)]
pub struct SetUserPlan {
    pub email: String,
    pub plan: Plan,
}
