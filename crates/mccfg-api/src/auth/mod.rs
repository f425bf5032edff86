//! 인증 및 권한 부여.
//!
//! # 구성 요소
//!
//! - [`jwt`]: HS256 토큰 코덱 ([`TokenCodec`], [`sign`], [`verify`])
//! - [`credentials`]: 사용자명/비밀번호 검증 ([`CredentialVerifier`])
//! - [`refresh`]: 1회용 갱신 토큰 저장 ([`RefreshStore`])
//! - [`issuer`]: 토큰 쌍 발급 및 회전 ([`TokenIssuer`])
//! - [`guard`], [`middleware`]: 접근/역할 가드
//! - [`registry`]: 라우트별 공개 여부와 필요 역할

pub mod credentials;
pub mod error;
pub mod guard;
pub mod issuer;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod refresh;
pub mod registry;

pub use credentials::{CredentialVerifier, SignInCredentials};
pub use error::{AuthError, AuthResult, UserRef};
pub use guard::{AccessGuard, GuardDecision, RoleGuard};
pub use issuer::{TokenIssuer, TokenPair, BEARER_PREFIX};
pub use jwt::{sign, verify, SignOptions, TokenCodec};
pub use middleware::{access_guard, role_guard, CurrentUser};
pub use password::{hash_password, verify_password, PasswordError};
pub use refresh::{generate_opaque_token, RefreshStore};
pub use registry::{RouteAccess, RouteRegistry};
