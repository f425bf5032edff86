//! 자격 증명 검증.

use std::sync::Arc;

use mccfg_core::User;
use serde::Deserialize;
use tracing::{debug, error};
use utoipa::ToSchema;
use validator::Validate;

use super::error::{AuthError, AuthResult, UserRef};
use super::password::{verify_password_blocking, PasswordError};
use crate::repository::UserStore;

/// 로그인 요청.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignInCredentials {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// 사용자명/비밀번호 검증기. 저장소를 읽기만 합니다.
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// 검사 순서: 존재 → 인증 완료 여부 → 비밀번호.
    pub async fn verify_credentials(&self, credentials: SignInCredentials) -> AuthResult<User> {
        let user = self
            .users
            .find_by_username(&credentials.username)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(UserRef::Username(credentials.username.clone())))?;

        if !user.verified {
            debug!(user_id = user.id, "Sign-in rejected: account not verified");
            return Err(AuthError::AccountNotVerified);
        }

        match verify_password_blocking(credentials.password, user.salt.clone(), user.hash.clone())
            .await
        {
            Ok(()) => Ok(user),
            Err(PasswordError::VerificationFailed) => {
                debug!(user_id = user.id, "Sign-in rejected: wrong password");
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                error!(user_id = user.id, error = %e, "Stored password hash is unusable");
                Err(AuthError::PasswordHashing)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::{generate_salt, hash_password};
    use crate::repository::MemoryStore;
    use mccfg_core::{NewUser, Role};

    async fn store_with_user(verified: bool) -> MemoryStore {
        let store = MemoryStore::new();
        let salt = generate_salt();
        let hash = hash_password("password", &salt).unwrap();
        UserStore::insert(
            &store,
            NewUser {
                username: "user".to_string(),
                email: "user@example.com".to_string(),
                salt,
                hash,
                verified,
                role: Role::Read,
            },
        )
        .await
        .unwrap();
        store
    }

    fn creds(username: &str, password: &str) -> SignInCredentials {
        SignInCredentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let verifier = CredentialVerifier::new(Arc::new(store_with_user(true).await));
        let result = verifier.verify_credentials(creds("ghost", "password")).await;
        assert!(matches!(result, Err(AuthError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_unverified_checked_before_password() {
        let verifier = CredentialVerifier::new(Arc::new(store_with_user(false).await));
        let result = verifier.verify_credentials(creds("user", "wrong")).await;
        assert!(matches!(result, Err(AuthError::AccountNotVerified)));
    }

    #[tokio::test]
    async fn test_wrong_and_right_password() {
        let verifier = CredentialVerifier::new(Arc::new(store_with_user(true).await));

        let wrong = verifier.verify_credentials(creds("user", "pass")).await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));

        let user = verifier
            .verify_credentials(creds("user", "password"))
            .await
            .unwrap();
        assert_eq!(user.username, "user");
    }

    #[test]
    fn test_empty_fields_fail_validation() {
        assert!(creds("", "x").validate().is_err());
        assert!(creds("user", "password").validate().is_ok());
    }
}
