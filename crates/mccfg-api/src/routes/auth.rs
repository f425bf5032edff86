//! 가입 및 로그인 endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use mccfg_core::UserDto;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use super::JsonBody;
use crate::auth::{AuthResult, SignInCredentials};
use crate::services::SignUpRequest;
use crate::state::AppState;

/// 가입 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignUpResponse {
    pub user: UserDto,
}

/// 로그인 응답. `accessToken`에는 `"Bearer "` 접두사가 포함됩니다.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub user: UserDto,
    pub access_token: String,
    pub refresh_token: String,
}

/// 가입.
///
/// POST /auth/sign-up
#[utoipa::path(
    post,
    path = "/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "가입 성공 (미인증 상태)", body = SignUpResponse),
        (status = 400, description = "검증 실패", body = crate::error::ApiErrorResponse),
        (status = 409, description = "사용자명 또는 이메일 중복", body = crate::error::ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<SignUpRequest>,
) -> AuthResult<Json<SignUpResponse>> {
    let user = state.accounts.sign_up(request).await?;
    Ok(Json(SignUpResponse { user }))
}

/// 로그인. 자격 증명을 검증하고 토큰 쌍을 발급합니다.
///
/// POST /auth/sign-in
#[utoipa::path(
    post,
    path = "/auth/sign-in",
    request_body = SignInCredentials,
    responses(
        (status = 200, description = "로그인 성공", body = SignInResponse),
        (status = 401, description = "미인증 계정 또는 잘못된 비밀번호", body = crate::error::ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = crate::error::ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    JsonBody(credentials): JsonBody<SignInCredentials>,
) -> AuthResult<Json<SignInResponse>> {
    credentials.validate()?;

    let user = state.credentials.verify_credentials(credentials).await?;
    let pair = state.issuer.issue_tokens_pair(&user.claim()).await?;

    info!(user_id = user.id, "User signed in");
    Ok(Json(SignInResponse {
        user: user.to_dto(),
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/sign-up", post(sign_up))
        .route("/auth/sign-in", post(sign_in))
}
