//! Axum용 가드 미들웨어 및 신원 추출기.
//!
//! 두 미들웨어 모두 `route_layer`로 적용되어야 `MatchedPath`를 볼 수 있습니다.
//! 역할 가드 레이어를 먼저 추가하고 접근 가드 레이어를 나중에 추가하면
//! 접근 가드가 바깥에서 먼저 실행됩니다.
//!
//! ```rust,ignore
//! router
//!     .route_layer(middleware::from_fn_with_state(state.clone(), role_guard))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), access_guard))
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, MatchedPath, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use mccfg_core::Identity;
use tracing::{debug, warn};

use super::error::AuthError;
use super::guard::{GuardDecision, RoleGuard};
use super::registry::RouteAccess;
use crate::state::AppState;

fn route_of(matched: Option<&MatchedPath>, request: &Request) -> String {
    matched
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

fn route_access<'a>(state: &'a AppState, request: &Request, route: &str) -> &'a RouteAccess {
    state.registry.lookup(request.method(), route)
}

fn reject(error: AuthError, request: &Request, route: &str) -> Response {
    warn!(
        method = %request.method(),
        route = %route,
        code = error.code(),
        "Request rejected by guard"
    );
    error.into_response_for(request.method(), request.uri())
}

/// 접근 가드 미들웨어.
///
/// 공개 라우트는 그대로 통과하고, 그 외에는 Bearer 토큰을 검증하여
/// [`Identity`]를 요청 extension에 첨부합니다.
pub async fn access_guard(
    State(state): State<Arc<AppState>>,
    matched: Option<MatchedPath>,
    mut request: Request,
    next: Next,
) -> Response {
    let route = route_of(matched.as_ref(), &request);
    let access = route_access(&state, &request, &route);

    let authorization = match request.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(value) => Some(value),
            Err(_) => return reject(AuthError::InvalidTokenType, &request, &route),
        },
    };

    match state.access_guard.check(access, authorization) {
        Ok(GuardDecision::Public) => next.run(request).await,
        Ok(GuardDecision::Authenticated(identity)) => {
            debug!(user_id = identity.id, route = %route, "Request authenticated");
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => reject(e, &request, &route),
    }
}

/// 역할 가드 미들웨어. 접근 가드 다음에 실행되어야 합니다.
pub async fn role_guard(
    State(state): State<Arc<AppState>>,
    matched: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let route = route_of(matched.as_ref(), &request);
    let access = route_access(&state, &request, &route);

    match RoleGuard::check(access, request.extensions().get::<Identity>()) {
        Ok(_) => next.run(request).await,
        Err(e) => reject(e, &request, &route),
    }
}

/// 인증된 신원 추출기.
///
/// 접근 가드가 첨부한 [`Identity`]를 꺼냅니다. 없으면
/// [`AuthError::UnauthorizedNoIdentity`]로 거부합니다.
///
/// ```rust,ignore
/// async fn me(CurrentUser(identity): CurrentUser) -> Json<Identity> {
///     Json(identity)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthError::UnauthorizedNoIdentity)
    }
}
