//! Data Transfer Objects - 统一响应结构

use serde::Serialize;

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// `{"success": true}`
#[derive(Debug, Serialize)]
pub struct SuccessFlag {
    pub success: bool,
}

impl ApiResponse<SuccessFlag> {
    /// 成功但无业务数据
    pub fn ok() -> Self {
        Self::success(SuccessFlag { success: true })
    }
}
