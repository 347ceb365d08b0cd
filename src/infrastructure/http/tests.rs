//! Router 级别测试

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

use crate::application::ports::{
    AffirmationRepositoryPort, AudioStoragePort, CategoryRepositoryPort, TokenKind,
    TokenServicePort,
};
use crate::domain::Plan;
use crate::infrastructure::adapters::FakeTtsClientConfig;
use crate::infrastructure::http::{build_router, AppState, HandlerLimits};
use crate::test_support::TestContext;

fn app(ctx: &TestContext) -> Router {
    build_router(Arc::new(AppState::new(ctx.ports(), HandlerLimits::default())))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn access_token(ctx: &TestContext, user_id: Uuid) -> String {
    ctx.tokens.issue(user_id, TokenKind::Access).unwrap()
}

#[tokio::test]
async fn test_health_payload_is_exact() {
    let ctx = TestContext::new().await;
    let response = send(&app(&ctx), Method::GET, "/api/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_categories_are_ordered() {
    let ctx = TestContext::new().await;
    let response = send(&app(&ctx), Method::GET, "/api/categories", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["errno"], 0);
    let slugs: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["slug"].as_str().unwrap())
        .collect();
    assert_eq!(
        slugs,
        vec!["financeiro", "saude", "sono", "autoestima", "produtividade"]
    );
}

#[tokio::test]
async fn test_auth_flow() {
    let ctx = TestContext::new().await;
    let app = app(&ctx);

    let response = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": "ana@example.com", "password": "segredo123"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    let access = json["data"]["access_token"].as_str().unwrap().to_string();
    let refresh = json["data"]["refresh_token"].as_str().unwrap().to_string();
    assert!(json["data"]["user"].get("password_hash").is_none());

    let response = send(&app, Method::GET, "/api/auth/me", Some(&access), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["email"], "ana@example.com");

    // refresh token 不能当作 access token 使用，反之亦然
    let response = send(&app, Method::GET, "/api/auth/me", Some(&refresh), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = send(&app, Method::POST, "/api/auth/refresh", Some(&access), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, Method::POST, "/api/auth/refresh", Some(&refresh), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(json_body(response).await["data"]["access_token"].is_string());

    let response = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": "ANA@example.com", "password": "segredo123"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let ctx = TestContext::new().await;
    let response = send(&app(&ctx), Method::GET, "/api/affirmations", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["errno"], 401);
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn test_default_affirmations_are_public() {
    let ctx = TestContext::new().await;
    let response = send(&app(&ctx), Method::GET, "/api/affirmations/default", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 100);
    assert_eq!(items[0]["category"], "financeiro");
    assert!(items.iter().all(|i| i["enabled"] == true && i["is_custom"] == false));
}

#[tokio::test]
async fn test_premium_routes_reject_free_users() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("free@example.com", Plan::Free).await;
    let token = access_token(&ctx, user.id);
    let categories = ctx.categories.find_all().await.unwrap();

    let response = send(
        &app(&ctx),
        Method::POST,
        "/api/affirmations",
        Some(&token),
        Some(json!({"category_id": categories[0].id.to_string(), "text": "Eu sou capaz."})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["errno"], 403);
}

#[tokio::test]
async fn test_batch_update_requires_array() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("ana@example.com", Plan::Free).await;
    let token = access_token(&ctx, user.id);
    let app = app(&ctx);

    let response = send(
        &app,
        Method::PUT,
        "/api/affirmations/batch",
        Some(&token),
        Some(json!({"id": "x"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Expected array of updates");

    let first = ctx.affirmations.find_all().await.unwrap().remove(0);
    let response = send(
        &app,
        Method::PUT,
        "/api/affirmations/batch",
        Some(&token),
        Some(json!([
            {"id": first.id.to_string(), "enabled": false},
            {"enabled": true},
            {"id": Uuid::new_v4().to_string(), "order": 1}
        ])),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["updated"], 1);
}

#[tokio::test]
async fn test_batch_generate_reports_quota() {
    let ctx = TestContext::with_tts(FakeTtsClientConfig {
        character_limit: 10,
        ..Default::default()
    })
    .await;
    let user = ctx.create_user("vip@example.com", Plan::Premium).await;
    let token = access_token(&ctx, user.id);
    let first = ctx.affirmations.find_all().await.unwrap().remove(0);

    let response = send(
        &app(&ctx),
        Method::POST,
        "/api/generate/batch",
        Some(&token),
        Some(json!({"affirmation_ids": [first.id], "voice_id": "v1"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"], "Not enough characters remaining");
    assert_eq!(json["data"]["required"], first.text.chars().count() as u64);
    assert_eq!(json["data"]["remaining"], 10);
}

#[tokio::test]
async fn test_malformed_ids_are_skipped() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("vip@example.com", Plan::Premium).await;
    let token = access_token(&ctx, user.id);
    let first = ctx.affirmations.find_all().await.unwrap().remove(0);
    let router = app(&ctx);
    let ids = json!([first.id, "not-a-uuid", "65a1b2c3d4e5f6a7b8c9d0e1", 42]);

    let response = send(
        &router,
        Method::POST,
        "/api/generate/batch",
        Some(&token),
        Some(json!({"affirmation_ids": ids, "voice_id": "v1"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["success"], 1);
    assert_eq!(json["data"]["failed"], 0);
    assert_eq!(json["data"]["results"][0]["affirmation_id"], first.id.to_string());

    let response = send(
        &router,
        Method::POST,
        "/api/generate/estimate",
        Some(&token),
        Some(json!({"affirmation_ids": ids})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["affirmation_count"], 1);
    assert_eq!(
        json["data"]["total_characters"],
        first.text.chars().count() as u64
    );

    let response = send(
        &router,
        Method::POST,
        "/api/generate/batch",
        Some(&token),
        Some(json!({"affirmation_ids": [], "voice_id": "v1"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_audio_of_unknown_id_succeeds() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("ana@example.com", Plan::Free).await;
    let token = access_token(&ctx, user.id);

    let response = send(
        &app(&ctx),
        Method::DELETE,
        &format!("/api/audio/{}", Uuid::new_v4()),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["success"], true);

    let response = send(
        &app(&ctx),
        Method::DELETE,
        "/api/audio/65a1b2c3d4e5f6a7b8c9d0e1",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_preview_returns_raw_audio() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("ana@example.com", Plan::Free).await;
    let token = access_token(&ctx, user.id);

    let response = send(
        &app(&ctx),
        Method::POST,
        "/api/generate/preview",
        Some(&token),
        Some(json!({"voice_id": "v1"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=preview.mp3"
    );
    assert_eq!(ctx.storage.base_dir().read_dir().unwrap().count(), 0);
}

#[tokio::test]
async fn test_serves_stored_audio() {
    let ctx = TestContext::new().await;
    let app = app(&ctx);
    ctx.storage
        .save("voices/v1/affirmations/sono/a.mp3", b"ID3audio")
        .await
        .unwrap();

    let response = send(
        &app,
        Method::GET,
        "/api/audio/file/voices/v1/affirmations/sono/a.mp3",
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=31536000, immutable"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ID3audio");

    for uri in [
        "/api/audio/file/voices/../../secret.mp3",
        "/api/audio/file/voices/v1/missing.mp3",
    ] {
        let response = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_config_roundtrip() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("ana@example.com", Plan::Free).await;
    let token = access_token(&ctx, user.id);
    let app = app(&ctx);

    let response = send(&app, Method::GET, "/api/config", Some(&token), None).await;
    assert_eq!(json_body(response).await["data"]["voice_volume"], 0.8);

    let response = send(
        &app,
        Method::PUT,
        "/api/config",
        Some(&token),
        Some(json!({"binaural_base_freq": 600})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        Method::PUT,
        "/api/config",
        Some(&token),
        Some(json!({"gap_between_sec": 4})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["data"]["gap_between_sec"], 4);
}
