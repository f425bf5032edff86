//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 `Arc`로 래핑되어 핸들러와 가드 미들웨어에 주입됩니다.

use std::sync::Arc;

use mccfg_core::{AuthConfig, CoreResult};
use sqlx::PgPool;

use crate::auth::{AccessGuard, CredentialVerifier, RefreshStore, RouteRegistry, TokenCodec, TokenIssuer};
use crate::repository::{
    ConfirmationTokenStore, MemoryStore, PgConfirmationTokenStore, PgRefreshTokenStore,
    PgUserStore, RefreshTokenStore, UserStore,
};
use crate::routes::route_registry;
use crate::services::AccountService;

/// 서비스가 사용하는 저장소 묶음.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub refresh_tokens: Arc<dyn RefreshTokenStore>,
    pub confirmations: Arc<dyn ConfirmationTokenStore>,
}

impl Stores {
    /// Postgres 저장소.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            refresh_tokens: Arc::new(PgRefreshTokenStore::new(pool.clone())),
            confirmations: Arc::new(PgConfirmationTokenStore::new(pool)),
        }
    }

    /// 인메모리 저장소. 전달된 `MemoryStore`와 데이터를 공유합니다.
    pub fn memory(store: &MemoryStore) -> Self {
        let shared = Arc::new(store.clone());
        Self {
            users: shared.clone(),
            refresh_tokens: shared.clone(),
            confirmations: shared,
        }
    }
}

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 액세스 토큰 코덱 (HS256)
    pub codec: TokenCodec,

    /// 접근 가드 (Bearer 토큰 검증)
    pub access_guard: AccessGuard,

    /// 라우트별 공개 여부와 필요 역할
    pub registry: RouteRegistry,

    /// 토큰 쌍 발급 및 갱신 토큰 회전
    pub issuer: TokenIssuer,

    /// 로그인 자격증명 검증
    pub credentials: CredentialVerifier,

    /// 가입, 계정 인증, 사용자 관리
    pub accounts: AccountService,

    pub users: Arc<dyn UserStore>,

    /// 데이터베이스 연결 풀 (인메모리 실행 시 None)
    pub db_pool: Option<PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 인증 설정과 저장소로 상태를 구성합니다.
    pub fn new(auth: &AuthConfig, stores: Stores) -> CoreResult<Self> {
        let codec = TokenCodec::from_config(auth)?;
        let refresh = RefreshStore::new(stores.users.clone(), stores.refresh_tokens.clone());

        Ok(Self {
            access_guard: AccessGuard::new(codec.clone()),
            registry: route_registry(),
            issuer: TokenIssuer::new(codec.clone(), refresh),
            credentials: CredentialVerifier::new(stores.users.clone()),
            accounts: AccountService::new(
                stores.users.clone(),
                stores.confirmations.clone(),
                auth.confirmation_ttl(),
            ),
            users: stores.users,
            codec,
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// 데이터베이스 연결 설정.
    pub fn with_db_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 데이터베이스 연결 설정 여부 확인.
    pub fn has_db_pool(&self) -> bool {
        self.db_pool.is_some()
    }

    /// DB 연결 상태 확인 (`SELECT 1`).
    pub async fn is_db_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
            None => false,
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 시크릿.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_JWT_SECRET: &str = "mccfg-test-secret";

/// 테스트용 AppState 생성 헬퍼.
///
/// 실제 DB 연결 없이 인메모리 저장소로 상태를 만듭니다. 액세스 토큰 만료는 3분입니다.
/// 반환된 `MemoryStore`로 사용자 시드와 토큰 확인을 할 수 있습니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> (AppState, MemoryStore) {
    let store = MemoryStore::new();
    let auth = AuthConfig::new(TEST_JWT_SECRET, "3m");
    let state = AppState::new(&auth, Stores::memory(&store))
        .expect("test auth config must be valid");
    (state, store)
}
