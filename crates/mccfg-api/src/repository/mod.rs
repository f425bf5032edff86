//! 인증 데이터 저장소.
//!
//! 서비스 계층은 아래 트레이트에만 의존합니다. 구현은 두 가지입니다:
//! - Postgres (`sqlx`): [`PgUserStore`], [`PgRefreshTokenStore`], [`PgConfirmationTokenStore`]
//! - 인메모리: [`MemoryStore`] (세 트레이트 모두 구현, 테스트 및 로컬 실행용)

use async_trait::async_trait;
use mccfg_core::{
    ConfirmationToken, NewConfirmationToken, NewUser, RefreshTokenRecord, RefreshTokenWithUser,
    User,
};

pub mod confirmation_tokens;
pub mod memory;
pub mod refresh_tokens;
pub mod users;

pub use confirmation_tokens::PgConfirmationTokenStore;
pub use memory::MemoryStore;
pub use refresh_tokens::PgRefreshTokenStore;
pub use users::PgUserStore;

/// 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// 고유 제약 위반 (값: 충돌한 컬럼명)
    #[error("unique constraint violated on {0}")]
    UniqueViolation(String),
    /// 참조 대상 행이 없음
    #[error("referenced row does not exist")]
    ForeignKeyViolation,
}

impl StoreError {
    /// 쓰기 쿼리 에러를 제약 위반 종류로 분류합니다.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                let field = match db.constraint() {
                    Some(c) if c.contains("email") => "email",
                    Some(c) if c.contains("token") => "token",
                    _ => "username",
                };
                return StoreError::UniqueViolation(field.to_string());
            }
            if db.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation;
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 사용자 저장소.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<User>>;

    /// 사용자명 또는 이메일이 일치하는 첫 사용자.
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> StoreResult<Option<User>>;

    async fn list(&self) -> StoreResult<Vec<User>>;

    /// 삽입. 사용자명/이메일 충돌 시 [`StoreError::UniqueViolation`].
    async fn insert(&self, user: NewUser) -> StoreResult<User>;

    /// 인증 완료 처리. 사용자가 없으면 `false`.
    async fn set_verified(&self, id: i32) -> StoreResult<bool>;
}

/// 갱신 토큰 저장소.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// 삽입. 사용자가 없으면 [`StoreError::ForeignKeyViolation`].
    async fn insert(&self, user_id: i32, token: &str) -> StoreResult<RefreshTokenRecord>;

    /// 토큰과 소유 사용자를 함께 조회합니다. 삭제하지 않습니다.
    async fn find_with_user(&self, token: &str) -> StoreResult<Option<RefreshTokenWithUser>>;

    /// 조건부 삭제. 삭제된 레코드를 반환하며, 동시 호출 중 정확히 하나만 `Some`을 받습니다.
    async fn delete_returning(&self, token: &str) -> StoreResult<Option<RefreshTokenRecord>>;
}

/// 이메일 확인 토큰 저장소.
#[async_trait]
pub trait ConfirmationTokenStore: Send + Sync {
    async fn insert(&self, token: NewConfirmationToken) -> StoreResult<ConfirmationToken>;

    /// 토큰을 원자적으로 꺼냅니다 (조회 + 삭제).
    async fn take(&self, token: &str) -> StoreResult<Option<ConfirmationToken>>;
}
