//! 계정 서비스.
//!
//! 가입(해시 + 사용자 생성 + 확인 토큰), 확인 토큰으로 계정 인증,
//! 관리자 사용자 생성, 사용자 목록.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use mccfg_core::{NewConfirmationToken, NewUser, Role, UserDto};
use serde::Deserialize;
use tracing::{debug, info};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::password::hash_with_new_salt;
use crate::auth::{generate_opaque_token, AuthError, AuthResult};
use crate::repository::{ConfirmationTokenStore, StoreError, UserStore};

/// 가입 요청.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[validate(length(min = 1, message = "'username' property is missing in request body!"))]
    pub username: String,
    #[validate(email(message = "'email' must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "'password' property is missing in request body!"))]
    pub password: String,
}

/// 관리자 사용자 생성 요청.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "'username' property is missing in request body!"))]
    pub username: String,
    #[validate(email(message = "'email' must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "'password' property is missing in request body!"))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    confirmations: Arc<dyn ConfirmationTokenStore>,
    confirmation_ttl: TimeDelta,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserStore>,
        confirmations: Arc<dyn ConfirmationTokenStore>,
        confirmation_ttl: TimeDelta,
    ) -> Self {
        Self {
            users,
            confirmations,
            confirmation_ttl,
        }
    }

    /// 일반 가입. 역할은 `read`, 미인증 상태로 생성됩니다.
    pub async fn sign_up(&self, request: SignUpRequest) -> AuthResult<UserDto> {
        request.validate()?;
        self.register(request.username, request.email, request.password, Role::Read)
            .await
    }

    /// 관리자 경로의 사용자 생성.
    pub async fn create_user(&self, request: CreateUserRequest) -> AuthResult<UserDto> {
        request.validate()?;
        self.register(request.username, request.email, request.password, request.role)
            .await
    }

    async fn register(
        &self,
        username: String,
        email: String,
        password: String,
        role: Role,
    ) -> AuthResult<UserDto> {
        if let Some(existing) = self
            .users
            .find_by_username_or_email(&username, &email)
            .await?
        {
            return Err(if existing.username == username {
                AuthError::UsernameTaken(username)
            } else {
                AuthError::EmailTaken(email)
            });
        }

        let (salt, hash) = hash_with_new_salt(password)
            .await
            .map_err(|_| AuthError::PasswordHashing)?;

        let user = self
            .users
            .insert(NewUser {
                username: username.clone(),
                email: email.clone(),
                salt,
                hash,
                verified: false,
                role,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(field) if field == "email" => AuthError::EmailTaken(email),
                StoreError::UniqueViolation(_) => AuthError::UsernameTaken(username),
                other => other.into(),
            })?;

        // 메일 발송은 외부 채널 몫이며 토큰 값은 기록하지 않습니다.
        let confirmation = self
            .confirmations
            .insert(NewConfirmationToken {
                token: generate_opaque_token(),
                expires_at: Utc::now() + self.confirmation_ttl,
                user_id: user.id,
            })
            .await?;
        debug!(
            user_id = user.id,
            expires_at = %confirmation.expires_at,
            "Confirmation token issued"
        );

        info!(user_id = user.id, username = %user.username, role = %user.role, "User registered");
        Ok(user.to_dto())
    }

    /// 확인 토큰으로 계정을 인증합니다. 토큰은 결과와 상관없이 소비됩니다.
    pub async fn verify_account(&self, token: &str) -> AuthResult<()> {
        let confirmation = self
            .confirmations
            .take(token)
            .await?
            .ok_or(AuthError::ConfirmationTokenInvalid)?;

        let user_id = confirmation
            .user_id
            .ok_or(AuthError::ConfirmationTokenNoUser)?;

        if confirmation.is_expired_at(Utc::now()) {
            return Err(AuthError::ConfirmationTokenExpired);
        }

        if !self.users.set_verified(user_id).await? {
            return Err(AuthError::ConfirmationTokenNoUser);
        }

        info!(user_id, "Account verified");
        Ok(())
    }

    pub async fn list_users(&self) -> AuthResult<Vec<UserDto>> {
        let users = self.users.list().await?;
        Ok(users.iter().map(UserDto::from).collect())
    }
}
