//! Auth HTTP Handlers

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::commands::handlers::{AccessTokenResponse, AuthResponse, UserResponse};
use crate::application::{GetCurrentUser, Login, RefreshToken, Register};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{AuthUser, BearerToken};
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let Json(req) = body?;

    let result = state
        .register_handler
        .handle(Register {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(result))))
}

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let Json(req) = body?;

    let result = state
        .login_handler
        .handle(Login {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// 用 refresh token 换取新的 access token
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<AccessTokenResponse>>, ApiError> {
    let result = state
        .refresh_token_handler
        .handle(RefreshToken {
            refresh_token: token,
        })
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// 当前用户
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let result = state
        .current_user_handler
        .handle(GetCurrentUser { user_id })
        .await?;

    Ok(Json(ApiResponse::success(result)))
}
