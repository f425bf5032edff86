//! 갱신 토큰 및 이메일 확인 토큰 레코드.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::User;

/// 저장된 갱신 토큰. 한 번만 사용할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub token: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

/// 소유 사용자가 채워진 갱신 토큰.
#[derive(Debug, Clone)]
pub struct RefreshTokenWithUser {
    pub record: RefreshTokenRecord,
    pub user: User,
}

/// 가입 시 발급되는 이메일 확인 토큰.
///
/// 사용자가 삭제되면 `user_id`는 `NULL`이 됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct ConfirmationToken {
    pub id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: Option<i32>,
}

impl ConfirmationToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct NewConfirmationToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_confirmation_expiry_boundary() {
        let now = Utc::now();
        let token = ConfirmationToken {
            id: Uuid::new_v4(),
            token: "abc".to_string(),
            expires_at: now,
            user_id: Some(1),
        };
        assert!(token.is_expired_at(now));
        assert!(!token.is_expired_at(now - TimeDelta::seconds(1)));
    }
}
