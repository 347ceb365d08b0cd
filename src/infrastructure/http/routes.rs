//! HTTP Routes
//!
//! API Endpoints:
//! - /api/health                           GET     健康检查
//! - /api/auth/register                    POST    注册
//! - /api/auth/login                       POST    登录
//! - /api/auth/refresh                     POST    刷新 access token（refresh token）
//! - /api/auth/me                          GET     当前用户
//! - /api/categories                       GET     分类列表
//! - /api/affirmations/default             GET     系统默认肯定语
//! - /api/affirmations                     GET     用户合并列表
//! - /api/affirmations                     POST    创建自定义肯定语（premium）
//! - /api/affirmations/batch               PUT     批量更新
//! - /api/affirmations/:id                 PUT     更新启用状态 / 顺序
//! - /api/affirmations/:id                 DELETE  删除自定义肯定语（premium）
//! - /api/generate/affirmation/:id         POST    生成单条音频（premium）
//! - /api/generate/preview                 POST    试听
//! - /api/generate/batch                   POST    批量生成（premium）
//! - /api/generate/estimate                POST    字符用量估算
//! - /api/voices                           GET     服务商音色
//! - /api/voices/configured                GET     已配置音色
//! - /api/voices/default                   GET     默认音色
//! - /api/voices/recommended               GET     推荐音色
//! - /api/voices/user-info                 GET     服务商订阅额度
//! - /api/voices/preview/:voice_id         GET     音色试听地址
//! - /api/audio/file/*path                 GET     音频文件
//! - /api/audio/upload/:affirmation_id     POST    上传录音（premium）
//! - /api/audio/:affirmation_id            DELETE  解除音频关联
//! - /api/config                           GET/PUT 播放配置

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/categories", get(handlers::list_categories))
        .route(
            "/config",
            get(handlers::get_config).put(handlers::update_config),
        )
        .nest("/auth", auth_routes())
        .nest("/affirmations", affirmation_routes())
        .nest("/generate", generate_routes())
        .nest("/voices", voice_routes())
        .nest("/audio", audio_routes())
}

/// Auth 路由
fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/me", get(handlers::me))
}

/// Affirmation 路由
fn affirmation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::list_user_affirmations).post(handlers::create_affirmation),
        )
        .route("/default", get(handlers::list_default_affirmations))
        .route("/batch", put(handlers::batch_update_affirmations))
        .route(
            "/:id",
            put(handlers::update_affirmation).delete(handlers::delete_affirmation),
        )
}

/// Generate 路由
fn generate_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/affirmation/:id", post(handlers::generate_affirmation))
        .route("/preview", post(handlers::preview))
        .route("/batch", post(handlers::batch_generate))
        .route("/estimate", post(handlers::estimate))
}

/// Voice 路由
fn voice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_voices))
        .route("/configured", get(handlers::list_configured_voices))
        .route("/default", get(handlers::default_voice))
        .route("/recommended", get(handlers::recommended_voices))
        .route("/user-info", get(handlers::subscription_info))
        .route("/preview/:voice_id", get(handlers::voice_preview))
}

/// Audio 路由
fn audio_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/file/*path", get(handlers::serve_audio_file))
        .route("/upload/:affirmation_id", post(handlers::upload_audio))
        .route("/:affirmation_id", delete(handlers::delete_audio))
}
