//! 사용자 역할.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// DB에는 `user_role` enum으로, JSON과 토큰 클레임에는 소문자 문자열로 저장됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "sqlx-support",
    derive(sqlx::Type),
    sqlx(type_name = "user_role", rename_all = "lowercase")
)]
pub enum Role {
    /// 관리자 - 사용자 생성 등 관리 작업
    Admin,
    /// 조회 전용 (가입 시 기본값)
    #[default]
    Read,
    /// 카탈로그 편집
    Write,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Read => "read",
            Role::Write => "write",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
