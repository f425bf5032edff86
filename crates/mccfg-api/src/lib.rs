//! 모드 설정 카탈로그의 인증 REST API.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (가입, 로그인, 토큰 갱신, 사용자 관리)
//! - JWT 접근 가드와 역할 가드
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트와 라우트 접근 규칙
//! - [`auth`]: 토큰 코덱, 자격 증명 검증, 토큰 발급, 가드
//! - [`services`]: 계정 서비스
//! - [`repository`]: 사용자/토큰 저장소 (Postgres, 인메모리)
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{AuthError, AuthResult, TokenCodec, TokenIssuer, TokenPair};
pub use error::ApiErrorResponse;
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::{create_api_router, route_registry};
pub use state::{AppState, Stores};

#[cfg(any(test, feature = "test-utils"))]
pub use state::{create_test_state, TEST_JWT_SECRET};
