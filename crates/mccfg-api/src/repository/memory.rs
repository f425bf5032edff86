//! 인메모리 저장소.
//!
//! Postgres 스키마와 같은 제약을 흉내냅니다: 사용자명/이메일/토큰 고유성,
//! 사용자 삭제 시 갱신 토큰 cascade, 확인 토큰의 `user_id`는 `NULL`로 전환.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mccfg_core::{
    ConfirmationToken, NewConfirmationToken, NewUser, RefreshTokenRecord, RefreshTokenWithUser,
    User,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    ConfirmationTokenStore, RefreshTokenStore, StoreError, StoreResult, UserStore,
};

#[derive(Debug, Default)]
struct Tables {
    next_user_id: i32,
    users: Vec<User>,
    refresh_tokens: HashMap<String, RefreshTokenRecord>,
    confirmation_tokens: HashMap<String, ConfirmationToken>,
}

/// 세 저장소 트레이트를 모두 구현하는 공유 인메모리 저장소.
///
/// 복제본은 같은 테이블을 공유합니다.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 사용자를 삭제합니다. 갱신 토큰은 함께 삭제되고 확인 토큰은 소유자를 잃습니다.
    pub async fn delete_user(&self, id: i32) -> bool {
        let mut tables = self.tables.lock().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return false;
        }
        tables.refresh_tokens.retain(|_, t| t.user_id != id);
        for token in tables.confirmation_tokens.values_mut() {
            if token.user_id == Some(id) {
                token.user_id = None;
            }
        }
        true
    }

    /// 특정 사용자의 갱신 토큰 수.
    pub async fn refresh_token_count(&self, user_id: i32) -> usize {
        let tables = self.tables.lock().await;
        tables
            .refresh_tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .count()
    }

    /// 확인 토큰 값 조회 (메일 발송 대체 경로).
    pub async fn confirmation_token_for(&self, user_id: i32) -> Option<String> {
        let tables = self.tables.lock().await;
        tables
            .confirmation_tokens
            .values()
            .find(|t| t.user_id == Some(user_id))
            .map(|t| t.token.clone())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.clone())
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation("username".to_string()));
        }
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation("email".to_string()));
        }

        tables.next_user_id += 1;
        let created = User {
            id: tables.next_user_id,
            username: user.username,
            email: user.email,
            salt: user.salt,
            hash: user.hash,
            verified: user.verified,
            role: user.role,
            created_at: Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn set_verified(&self, id: i32) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.verified = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn insert(&self, user_id: i32, token: &str) -> StoreResult<RefreshTokenRecord> {
        let mut tables = self.tables.lock().await;
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(StoreError::ForeignKeyViolation);
        }
        if tables.refresh_tokens.contains_key(token) {
            return Err(StoreError::UniqueViolation("token".to_string()));
        }

        let record = RefreshTokenRecord {
            id: Uuid::new_v4(),
            token: token.to_string(),
            user_id,
            created_at: Utc::now(),
        };
        tables
            .refresh_tokens
            .insert(token.to_string(), record.clone());
        Ok(record)
    }

    async fn find_with_user(&self, token: &str) -> StoreResult<Option<RefreshTokenWithUser>> {
        let tables = self.tables.lock().await;
        let Some(record) = tables.refresh_tokens.get(token) else {
            return Ok(None);
        };
        let user = tables.users.iter().find(|u| u.id == record.user_id);
        Ok(user.map(|user| RefreshTokenWithUser {
            record: record.clone(),
            user: user.clone(),
        }))
    }

    async fn delete_returning(&self, token: &str) -> StoreResult<Option<RefreshTokenRecord>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.refresh_tokens.remove(token))
    }
}

#[async_trait]
impl ConfirmationTokenStore for MemoryStore {
    async fn insert(&self, token: NewConfirmationToken) -> StoreResult<ConfirmationToken> {
        let mut tables = self.tables.lock().await;
        if !tables.users.iter().any(|u| u.id == token.user_id) {
            return Err(StoreError::ForeignKeyViolation);
        }
        if tables.confirmation_tokens.contains_key(&token.token) {
            return Err(StoreError::UniqueViolation("token".to_string()));
        }

        let record = ConfirmationToken {
            id: Uuid::new_v4(),
            token: token.token.clone(),
            expires_at: token.expires_at,
            user_id: Some(token.user_id),
        };
        tables
            .confirmation_tokens
            .insert(token.token, record.clone());
        Ok(record)
    }

    async fn take(&self, token: &str) -> StoreResult<Option<ConfirmationToken>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.confirmation_tokens.remove(token))
    }
}
