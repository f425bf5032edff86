//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/api/docs` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use mccfg_core::{Identity, Role, UserDto};

use crate::auth::{SignInCredentials, TokenPair};
use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentHealth, ComponentStatus, HealthResponse, RefreshRequest, SignInResponse,
    SignUpResponse,
};
use crate::services::{CreateUserRequest, SignUpRequest};

/// `Authorization: Bearer <JWT>` 보안 스키마 등록.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// MC cfg API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "MC cfg API",
        description = r#"
# 모드 설정 카탈로그 인증 API

가입, 로그인, 토큰 갱신, 사용자 관리를 위한 REST API입니다.

## 인증

보호된 엔드포인트는 `Authorization: Bearer <token>` 헤더가 필요합니다.
액세스 토큰은 로그인 응답의 `accessToken`에 접두사와 함께 전달됩니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 가입 및 로그인"),
        (name = "tokens", description = "토큰 - 갱신 토큰 교환"),
        (name = "users", description = "사용자 - 목록, 생성, 계정 인증")
    ),
    modifiers(&BearerAuth),
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,
            Role,
            UserDto,
            Identity,

            // ===== Auth =====
            SignUpRequest,
            SignUpResponse,
            SignInCredentials,
            SignInResponse,

            // ===== Tokens =====
            RefreshRequest,
            TokenPair,

            // ===== Users =====
            CreateUserRequest,
        )
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::auth::sign_up,
        crate::routes::auth::sign_in,
        crate::routes::tokens::refresh,
        crate::routes::users::list_users,
        crate::routes::users::create_user,
        crate::routes::users::verify_account,
        crate::routes::users::me,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/api/docs` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/api/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
