//! 사용자 및 신원 클레임.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::Role;

/// 저장된 사용자 (자격 증명 포함).
///
/// `salt`와 `hash`는 외부로 직렬화되지 않습니다. 응답에는 [`UserDto`]를 사용하세요.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub salt: String,
    pub hash: String,
    pub verified: bool,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 액세스 토큰에 담을 신원 클레임.
    pub fn claim(&self) -> IdentityClaim {
        IdentityClaim {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }

    pub fn to_dto(&self) -> UserDto {
        UserDto::from(self)
    }
}

/// 클라이언트에 노출되는 사용자 정보.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            verified: user.verified,
            created_at: user.created_at,
        }
    }
}

/// 액세스 토큰에 서명되는 신원 클레임.
///
/// 발급 이후 변경되지 않으며 토큰 갱신 시에만 사용자 레코드에서 다시 구성됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// 인증된 요청에 첨부되는 신원.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Identity {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<IdentityClaim> for Identity {
    fn from(claim: IdentityClaim) -> Self {
        Self {
            id: claim.id,
            username: claim.username,
            email: claim.email,
            role: claim.role,
        }
    }
}

/// 신규 사용자 삽입 값 (비밀번호는 이미 해시됨).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub salt: String,
    pub hash: String,
    pub verified: bool,
    pub role: Role,
}
