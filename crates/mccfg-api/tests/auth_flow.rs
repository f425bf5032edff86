//! 인증 흐름 통합 테스트
//!
//! 인메모리 저장소로 전체 라우터(가드 포함)를 구성하고 HTTP 요청으로 검증합니다.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use mccfg_api::auth::password::{generate_salt, hash_password};
use mccfg_api::auth::{SignOptions, TokenCodec};
use mccfg_api::repository::{MemoryStore, UserStore};
use mccfg_api::routes::create_api_router;
use mccfg_api::state::{AppState, Stores};
use mccfg_core::{AuthConfig, IdentityClaim, NewUser, Role, User};

const SECRET: &str = "integration-secret";

fn build_app(store: &MemoryStore, expires_in: &str) -> Router {
    let auth = AuthConfig::new(SECRET, expires_in);
    let state = Arc::new(AppState::new(&auth, Stores::memory(store)).unwrap());
    create_api_router(state.clone()).with_state(state)
}

async fn seed_user(store: &MemoryStore, username: &str, role: Role, verified: bool) -> User {
    let salt = generate_salt();
    let hash = hash_password("password", &salt).unwrap();
    store
        .insert(NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            salt,
            hash,
            verified,
            role,
        })
        .await
        .unwrap()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn sign_in(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/auth/sign-in",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await
}

#[tokio::test]
async fn test_sign_in_scenario() {
    let store = MemoryStore::new();
    let app = build_app(&store, "3m");
    let user = seed_user(&store, "username", Role::Read, false).await;

    let (status, body) = sign_in(&app, "username", "password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "ACCOUNT_NOT_VERIFIED");

    assert!(store.set_verified(user.id).await.unwrap());

    let (status, body) = sign_in(&app, "username", "pass").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
    assert_eq!(body["message"], "Invalid password");

    let (status, body) = sign_in(&app, "username", "password").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "username");
    assert!(body["user"].get("hash").is_none());
    assert!(body["accessToken"].as_str().unwrap().starts_with("Bearer "));
    assert_eq!(body["refreshToken"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_sign_in_unknown_user() {
    let store = MemoryStore::new();
    let app = build_app(&store, "3m");

    let (status, body) = sign_in(&app, "ghost", "password").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "USER_NOT_FOUND");
    assert_eq!(body["message"], "User with username: ghost does not exist!");
}

#[tokio::test]
async fn test_access_guard_rejections() {
    let store = MemoryStore::new();
    let app = build_app(&store, "3m");

    let cases = [
        (None, "MISSING_TOKEN"),
        (Some("Basic dXNlcjpwYXNz"), "INVALID_TOKEN_TYPE"),
        (Some("Bearer adwa.adwa"), "MALFORMED_TOKEN"),
        (Some("Bearer aaa.bbb.ccc"), "TOKEN_INVALID"),
    ];

    for (authorization, code) in cases {
        let (status, body) = send(&app, Method::GET, "/users/me", authorization, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{code}");
        assert_eq!(body["code"], code);
        assert_eq!(body["path"], "/users/me");
    }
}

#[tokio::test]
async fn test_token_from_other_secret_is_invalid() {
    let store = MemoryStore::new();
    let app = build_app(&store, "3m");
    let claim = IdentityClaim {
        id: 1,
        username: "user".to_string(),
        email: "user@example.com".to_string(),
        role: Role::Admin,
    };
    let forged = mccfg_api::auth::sign(
        &claim,
        SignOptions {
            secret: "another-secret",
            expires_in: "3m".parse().unwrap(),
        },
    )
    .unwrap();

    let (status, body) = send(
        &app,
        Method::GET,
        "/users/me",
        Some(&format!("Bearer {forged}")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn test_expired_access_token() {
    let store = MemoryStore::new();
    let app = build_app(&store, "1ms");
    let user = seed_user(&store, "user", Role::Read, true).await;
    let token = TokenCodec::new(SECRET, "1ms".parse().unwrap())
        .sign(&user.claim())
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/users/me",
        Some(&format!("Bearer {token}")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_current_identity() {
    let store = MemoryStore::new();
    let app = build_app(&store, "3m");
    seed_user(&store, "writer", Role::Write, true).await;

    let (_, session) = sign_in(&app, "writer", "password").await;
    let access = session["accessToken"].as_str().unwrap();

    let (status, body) = send(&app, Method::GET, "/users/me", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "writer");
    assert_eq!(body["role"], "write");
}

#[tokio::test]
async fn test_public_route_without_header() {
    let store = MemoryStore::new();
    let app = build_app(&store, "3m");
    seed_user(&store, "user", Role::Read, true).await;

    let (status, body) = send(&app, Method::GET, "/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // 공개 라우트는 잘못된 헤더도 무시
    let (status, _) = send(&app, Method::GET, "/users", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    // 로드 밸런서의 HEAD 요청도 GET 규칙을 따름
    let (status, _) = send(&app, Method::HEAD, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::HEAD, "/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_unknown_token() {
    let store = MemoryStore::new();
    let app = build_app(&store, "3m");

    let (status, body) = send(
        &app,
        Method::POST,
        "/tokens",
        None,
        Some(json!({ "refreshToken": "token" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_REFRESH_TOKEN");
}

#[tokio::test]
async fn test_refresh_rotates_once() {
    let store = MemoryStore::new();
    let app = build_app(&store, "3m");
    let user = seed_user(&store, "user", Role::Read, true).await;

    let (_, session) = sign_in(&app, "user", "password").await;
    let refresh = session["refreshToken"].as_str().unwrap().to_string();

    let (status, rotated) = send(
        &app,
        Method::POST,
        "/tokens",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(rotated["accessToken"].as_str().unwrap().starts_with("Bearer "));
    assert_ne!(rotated["refreshToken"], refresh.as_str());
    assert_eq!(store.refresh_token_count(user.id).await, 1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/tokens",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_REFRESH_TOKEN");
}

#[tokio::test]
async fn test_admin_only_route() {
    let store = MemoryStore::new();
    let app = build_app(&store, "3m");
    seed_user(&store, "reader", Role::Read, true).await;
    seed_user(&store, "admin", Role::Admin, true).await;

    let new_user = json!({
        "username": "editor",
        "email": "editor@example.com",
        "password": "password",
        "role": "write"
    });

    let (_, reader) = sign_in(&app, "reader", "password").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        reader["accessToken"].as_str(),
        Some(new_user.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "INSUFFICIENT_GRANTS");

    let (_, admin) = sign_in(&app, "admin", "password").await;
    let admin_token = admin["accessToken"].as_str();
    let (status, _) = send(&app, Method::POST, "/users", admin_token, Some(new_user.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, "/users", admin_token, Some(new_user)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "USERNAME_TAKEN");
}

#[tokio::test]
async fn test_sign_up_verify_sign_in() {
    let store = MemoryStore::new();
    let app = build_app(&store, "3m");

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/sign-up",
        None,
        Some(json!({
            "username": "steve",
            "email": "steve@example.com",
            "password": "password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "read");
    assert_eq!(body["user"]["verified"], false);
    let user_id = body["user"]["id"].as_i64().unwrap() as i32;

    let (status, _) = sign_in(&app, "steve", "password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = store.confirmation_token_for(user_id).await.unwrap();
    let verify_uri = format!("/users/verify/{token}");
    let (status, _) = send(&app, Method::POST, &verify_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = sign_in(&app, "steve", "password").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::POST, &verify_uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "CONFIRMATION_TOKEN_INVALID");
}

#[tokio::test]
async fn test_request_body_validation() {
    let store = MemoryStore::new();
    let app = build_app(&store, "3m");

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/sign-up",
        None,
        Some(json!({
            "username": "steve",
            "email": "not-an-email",
            "password": "password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/sign-in",
        None,
        Some(json!({ "username": "steve" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
