//! API 라우트.
//!
//! # 라우트 구조
//!
//! | 메서드 | 경로 | 접근 |
//! |---|---|---|
//! | POST | `/auth/sign-up` | 공개 |
//! | POST | `/auth/sign-in` | 공개 |
//! | POST | `/tokens` | 공개 |
//! | GET | `/users` | 공개 |
//! | POST | `/users` | `admin` |
//! | POST | `/users/verify/{token}` | 공개 |
//! | GET | `/users/me` | 인증 |
//! | GET | `/health`, `/health/ready` | 공개 |
//!
//! 접근 규칙은 [`route_registry`]에 라우트와 함께 선언합니다. `/metrics`와
//! Swagger UI는 가드 체인 밖에서 병합됩니다.

pub mod auth;
pub mod health;
pub mod tokens;
pub mod users;

pub use auth::{auth_router, SignInResponse, SignUpResponse};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use tokens::{tokens_router, RefreshRequest};
pub use users::users_router;

use std::sync::Arc;

use axum::{
    extract::{FromRequest, Request},
    http::Method,
    middleware, Json, Router,
};
use mccfg_core::Role;
use serde::de::DeserializeOwned;

use crate::auth::{access_guard, role_guard, AuthError, RouteAccess, RouteRegistry};
use crate::state::AppState;

/// 라우트별 접근 규칙.
pub fn route_registry() -> RouteRegistry {
    RouteRegistry::new()
        .with(Method::POST, "/auth/sign-up", RouteAccess::public())
        .with(Method::POST, "/auth/sign-in", RouteAccess::public())
        .with(Method::POST, "/tokens", RouteAccess::public())
        .with(Method::GET, "/users", RouteAccess::public())
        .with(Method::POST, "/users", RouteAccess::roles([Role::Admin]))
        .with(Method::POST, "/users/verify/{token}", RouteAccess::public())
        .with(Method::GET, "/users/me", RouteAccess::authenticated())
        .with(Method::GET, "/health", RouteAccess::public())
        .with(Method::GET, "/health/ready", RouteAccess::public())
}

/// 전체 API 라우터 생성.
///
/// 모든 라우트에 역할 가드와 접근 가드를 `route_layer`로 적용합니다.
/// 나중에 추가된 접근 가드가 먼저 실행됩니다.
pub fn create_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(auth_router())
        .merge(tokens_router())
        .merge(users_router())
        .merge(health_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), role_guard))
        .route_layer(middleware::from_fn_with_state(state, access_guard))
}

/// JSON 요청 본문 추출기.
///
/// 본문 파싱 실패를 `VALIDATION_ERROR` 응답으로 바꿉니다. 필드 검증은 서비스가 합니다.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| AuthError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_route_table() {
        let registry = route_registry();

        assert!(registry.lookup(&Method::POST, "/auth/sign-in").is_public);
        assert!(registry.lookup(&Method::POST, "/tokens").is_public);
        assert!(registry.lookup(&Method::GET, "/users").is_public);
        assert!(registry.lookup(&Method::POST, "/users/verify/{token}").is_public);

        let create = registry.lookup(&Method::POST, "/users");
        assert!(!create.is_public);
        assert!(create.required_roles.contains(&Role::Admin));

        let me = registry.lookup(&Method::GET, "/users/me");
        assert!(!me.is_public);
        assert!(me.required_roles.is_empty());
    }
}
