//! 사용자 endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use mccfg_core::{Identity, UserDto};

use super::JsonBody;
use crate::auth::{AuthResult, CurrentUser};
use crate::services::CreateUserRequest;
use crate::state::AppState;

/// 사용자 목록.
///
/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "사용자 목록", body = Vec<UserDto>)
    ),
    tag = "users"
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> AuthResult<Json<Vec<UserDto>>> {
    Ok(Json(state.accounts.list_users().await?))
}

/// 관리자 사용자 생성.
///
/// POST /users
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "생성됨"),
        (status = 401, description = "토큰 없음 또는 무효", body = crate::error::ApiErrorResponse),
        (status = 403, description = "권한 부족", body = crate::error::ApiErrorResponse),
        (status = 409, description = "사용자명 또는 이메일 중복", body = crate::error::ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> AuthResult<StatusCode> {
    state.accounts.create_user(request).await?;
    Ok(StatusCode::CREATED)
}

/// 확인 토큰으로 계정 인증.
///
/// POST /users/verify/{token}
#[utoipa::path(
    post,
    path = "/users/verify/{token}",
    params(("token" = String, Path, description = "확인 토큰")),
    responses(
        (status = 200, description = "인증 완료"),
        (status = 400, description = "만료되었거나 사용자 없는 토큰", body = crate::error::ApiErrorResponse),
        (status = 404, description = "존재하지 않는 토큰", body = crate::error::ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn verify_account(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> AuthResult<StatusCode> {
    state.accounts.verify_account(&token).await?;
    Ok(StatusCode::OK)
}

/// 현재 토큰의 신원.
///
/// GET /users/me
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "현재 신원", body = Identity),
        (status = 401, description = "토큰 없음 또는 무효", body = crate::error::ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn me(CurrentUser(identity): CurrentUser) -> Json<Identity> {
    Json(identity)
}

pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/me", get(me))
        .route("/users/verify/{token}", post(verify_account))
}
