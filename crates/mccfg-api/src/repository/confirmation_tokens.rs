//! 이메일 확인 토큰 Repository (Postgres).

use async_trait::async_trait;
use mccfg_core::{ConfirmationToken, NewConfirmationToken};
use sqlx::PgPool;

use super::{ConfirmationTokenStore, StoreError, StoreResult};

/// `confirmation_tokens` 테이블 저장소.
#[derive(Debug, Clone)]
pub struct PgConfirmationTokenStore {
    pool: PgPool,
}

impl PgConfirmationTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfirmationTokenStore for PgConfirmationTokenStore {
    async fn insert(&self, token: NewConfirmationToken) -> StoreResult<ConfirmationToken> {
        sqlx::query_as::<_, ConfirmationToken>(
            r#"
            INSERT INTO confirmation_tokens (token, expires_at, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, token, expires_at, user_id
            "#,
        )
        .bind(&token.token)
        .bind(token.expires_at)
        .bind(token.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_write)
    }

    async fn take(&self, token: &str) -> StoreResult<Option<ConfirmationToken>> {
        let record = sqlx::query_as::<_, ConfirmationToken>(
            r#"
            DELETE FROM confirmation_tokens
            WHERE token = $1
            RETURNING id, token, expires_at, user_id
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
