//! 갱신 토큰 Repository (Postgres).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mccfg_core::{RefreshTokenRecord, RefreshTokenWithUser, Role, User};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{RefreshTokenStore, StoreError, StoreResult};

/// 토큰 + 소유 사용자 조인 행.
#[derive(Debug, FromRow)]
struct TokenUserRow {
    token_id: Uuid,
    token: String,
    token_created_at: DateTime<Utc>,
    id: i32,
    username: String,
    email: String,
    salt: String,
    hash: String,
    verified: bool,
    role: Role,
    created_at: DateTime<Utc>,
}

impl From<TokenUserRow> for RefreshTokenWithUser {
    fn from(row: TokenUserRow) -> Self {
        Self {
            record: RefreshTokenRecord {
                id: row.token_id,
                token: row.token,
                user_id: row.id,
                created_at: row.token_created_at,
            },
            user: User {
                id: row.id,
                username: row.username,
                email: row.email,
                salt: row.salt,
                hash: row.hash,
                verified: row.verified,
                role: row.role,
                created_at: row.created_at,
            },
        }
    }
}

/// `refresh_tokens` 테이블 저장소.
#[derive(Debug, Clone)]
pub struct PgRefreshTokenStore {
    pool: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn insert(&self, user_id: i32, token: &str) -> StoreResult<RefreshTokenRecord> {
        sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            INSERT INTO refresh_tokens (token, user_id)
            VALUES ($1, $2)
            RETURNING id, token, user_id, created_at
            "#,
        )
        .bind(token)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_write)
    }

    async fn find_with_user(&self, token: &str) -> StoreResult<Option<RefreshTokenWithUser>> {
        let row = sqlx::query_as::<_, TokenUserRow>(
            r#"
            SELECT
                t.id AS token_id, t.token, t.created_at AS token_created_at,
                u.id, u.username, u.email, u.salt, u.hash, u.verified, u.role, u.created_at
            FROM refresh_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_returning(&self, token: &str) -> StoreResult<Option<RefreshTokenRecord>> {
        // 단일 DELETE 문이므로 같은 토큰에 대한 동시 호출 중 하나만 행을 돌려받습니다.
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            DELETE FROM refresh_tokens
            WHERE token = $1
            RETURNING id, token, user_id, created_at
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
