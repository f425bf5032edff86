//! 접근 가드와 역할 가드.
//!
//! 요청 흐름:
//!
//! ```text
//! Unauthenticated ─ public ─────────────────────────────▶ Allowed (신원 없음)
//!        │
//!        └─ TokenExtracted ─▶ TokenVerified ─▶ Authenticated (신원 첨부)
//!                 │                  │
//!                 └──────────────────┴─▶ Rejected(kind)
//! ```
//!
//! 역할 가드는 접근 가드 다음에 실행됩니다.

use mccfg_core::Identity;

use super::error::{AuthError, AuthResult};
use super::issuer::BEARER_PREFIX;
use super::jwt::TokenCodec;
use super::registry::RouteAccess;

/// 접근 가드 판정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 공개 라우트. 신원을 첨부하지 않습니다.
    Public,
    /// 토큰 검증 성공.
    Authenticated(Identity),
}

#[derive(Debug, Clone)]
pub struct AccessGuard {
    codec: TokenCodec,
}

impl AccessGuard {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    /// `Authorization` 헤더 값을 검사합니다.
    pub fn check(
        &self,
        access: &RouteAccess,
        authorization: Option<&str>,
    ) -> AuthResult<GuardDecision> {
        if access.is_public {
            return Ok(GuardDecision::Public);
        }

        let header = authorization.ok_or(AuthError::MissingToken)?;
        let token = header
            .strip_prefix(BEARER_PREFIX)
            .ok_or(AuthError::InvalidTokenType)?;

        if token.split('.').count() != 3 {
            return Err(AuthError::MalformedToken);
        }

        let claim = self.codec.verify(token)?;
        Ok(GuardDecision::Authenticated(Identity::from(claim)))
    }
}

/// 역할 가드.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleGuard;

impl RoleGuard {
    /// 필요 역할이 없거나 신원의 역할이 집합에 포함되면 `true`.
    pub fn check(access: &RouteAccess, identity: Option<&Identity>) -> AuthResult<bool> {
        if access.required_roles.is_empty() {
            return Ok(true);
        }

        let identity = identity.ok_or(AuthError::UnauthorizedNoIdentity)?;
        if access.required_roles.contains(&identity.role) {
            Ok(true)
        } else {
            Err(AuthError::InsufficientGrants)
        }
    }
}
