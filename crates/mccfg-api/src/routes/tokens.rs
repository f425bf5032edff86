//! 갱신 토큰 교환 endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::JsonBody;
use crate::auth::{AuthResult, TokenPair};
use crate::state::AppState;

/// 갱신 요청.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "refreshToken must not be empty"))]
    pub refresh_token: String,
}

/// 갱신 토큰을 새 토큰 쌍으로 교환합니다. 기존 토큰은 소비됩니다.
///
/// POST /tokens
#[utoipa::path(
    post,
    path = "/tokens",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "새 토큰 쌍", body = TokenPair),
        (status = 401, description = "유효하지 않은 갱신 토큰", body = crate::error::ApiErrorResponse)
    ),
    tag = "tokens"
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<RefreshRequest>,
) -> AuthResult<Json<TokenPair>> {
    request.validate()?;
    let pair = state.issuer.refresh(&request.refresh_token).await?;
    Ok(Json(pair))
}

pub fn tokens_router() -> Router<Arc<AppState>> {
    Router::new().route("/tokens", post(refresh))
}
