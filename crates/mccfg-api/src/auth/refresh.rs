//! 갱신 토큰 관리.
//!
//! 갱신 토큰은 사용자에 묶인 64자 영숫자 불투명 문자열이며 한 번만 사용할 수 있습니다.

use std::sync::Arc;

use mccfg_core::RefreshTokenWithUser;
use rand::{distributions::Alphanumeric, Rng};
use tracing::debug;

use super::error::{AuthError, AuthResult, UserRef};
use crate::repository::{RefreshTokenStore, StoreError, UserStore};

/// 생성되는 불투명 토큰 길이.
pub const OPAQUE_TOKEN_LEN: usize = 64;

/// 영숫자 랜덤 토큰 생성.
pub fn generate_opaque_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(OPAQUE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[derive(Clone)]
pub struct RefreshStore {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn RefreshTokenStore>,
}

impl RefreshStore {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<dyn RefreshTokenStore>) -> Self {
        Self { users, tokens }
    }

    /// 사용자에게 새 갱신 토큰을 발급합니다. 호출마다 다른 토큰입니다.
    pub async fn create(&self, user_id: i32) -> AuthResult<String> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AuthError::UserNotFound(UserRef::Id(user_id)));
        }

        let token = generate_opaque_token();
        match self.tokens.insert(user_id, &token).await {
            Ok(_) => Ok(token),
            // 조회 이후 사용자가 삭제된 경우
            Err(StoreError::ForeignKeyViolation) => {
                Err(AuthError::UserNotFound(UserRef::Id(user_id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 토큰 레코드와 소유 사용자를 반환합니다. 삭제하지 않습니다.
    pub async fn validate(&self, token: &str) -> AuthResult<RefreshTokenWithUser> {
        self.tokens
            .find_with_user(token)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)
    }

    /// 토큰을 조건부로 삭제합니다. 이미 사용된 토큰이면 [`AuthError::InvalidRefreshToken`].
    pub async fn consume(&self, token: &str) -> AuthResult<()> {
        match self.tokens.delete_returning(token).await? {
            Some(record) => {
                debug!(user_id = record.user_id, "Refresh token consumed");
                Ok(())
            }
            None => Err(AuthError::InvalidRefreshToken),
        }
    }

    /// 토큰 폐기. 없어도 성공합니다.
    pub async fn revoke(&self, token: &str) -> AuthResult<()> {
        self.tokens.delete_returning(token).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;
    use mccfg_core::{NewUser, Role};

    async fn setup() -> (RefreshStore, i32) {
        let store = MemoryStore::new();
        let user = UserStore::insert(
            &store,
            NewUser {
                username: "user".to_string(),
                email: "user@example.com".to_string(),
                salt: "salt".to_string(),
                hash: "hash".to_string(),
                verified: true,
                role: Role::Read,
            },
        )
        .await
        .unwrap();
        let shared = Arc::new(store);
        (RefreshStore::new(shared.clone(), shared), user.id)
    }

    #[test]
    fn test_opaque_token_shape() {
        let token = generate_opaque_token();
        assert_eq!(token.len(), OPAQUE_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_opaque_token());
    }

    #[tokio::test]
    async fn test_create_for_missing_user() {
        let (refresh, _) = setup().await;
        let result = refresh.create(404).await;
        assert!(matches!(
            result,
            Err(AuthError::UserNotFound(UserRef::Id(404)))
        ));
    }

    #[tokio::test]
    async fn test_create_validate_consume() {
        let (refresh, user_id) = setup().await;
        let first = refresh.create(user_id).await.unwrap();
        let second = refresh.create(user_id).await.unwrap();
        assert_ne!(first, second);

        let found = refresh.validate(&first).await.unwrap();
        assert_eq!(found.user.id, user_id);
        // validate는 삭제하지 않음
        assert!(refresh.validate(&first).await.is_ok());

        refresh.consume(&first).await.unwrap();
        assert!(matches!(
            refresh.validate(&first).await,
            Err(AuthError::InvalidRefreshToken)
        ));
        assert!(matches!(
            refresh.consume(&first).await,
            Err(AuthError::InvalidRefreshToken)
        ));
        refresh.revoke(&first).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let (refresh, _) = setup().await;
        assert!(matches!(
            refresh.validate("token").await,
            Err(AuthError::InvalidRefreshToken)
        ));
    }
}
