//! 토큰 쌍 발급 및 갱신 토큰 회전.

use mccfg_core::IdentityClaim;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use super::error::{AuthError, AuthResult};
use super::jwt::TokenCodec;
use super::refresh::RefreshStore;

/// 액세스 토큰 접두사.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Access Token + Refresh Token 쌍.
///
/// `access_token`은 `"Bearer "` 접두사가 붙은 상태로 전달됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct TokenIssuer {
    codec: TokenCodec,
    refresh: RefreshStore,
}

impl TokenIssuer {
    pub fn new(codec: TokenCodec, refresh: RefreshStore) -> Self {
        Self { codec, refresh }
    }

    /// 클레임으로 액세스 토큰에 서명하고 `claim.id` 사용자에게 갱신 토큰을 발급합니다.
    pub async fn issue_tokens_pair(&self, claim: &IdentityClaim) -> AuthResult<TokenPair> {
        let access = self.codec.sign(claim)?;
        let refresh_token = self.refresh.create(claim.id).await?;

        Ok(TokenPair {
            access_token: format!("{BEARER_PREFIX}{access}"),
            refresh_token,
        })
    }

    /// 갱신 토큰을 새 쌍으로 교환합니다.
    ///
    /// 새 쌍을 먼저 발급한 뒤 기존 레코드를 삭제하므로 발급이 실패하면 기존 토큰은
    /// 유효하게 남습니다. 동시 갱신에서 삭제 경쟁에 진 호출은 방금 만든 토큰을
    /// 폐기하고 [`AuthError::InvalidRefreshToken`]을 반환합니다.
    pub async fn refresh(&self, old_token: &str) -> AuthResult<TokenPair> {
        let existing = self.refresh.validate(old_token).await?;
        let claim = existing.user.claim();

        let pair = self.issue_tokens_pair(&claim).await?;

        if let Err(e) = self.refresh.consume(old_token).await {
            if matches!(e, AuthError::InvalidRefreshToken) {
                warn!(user_id = claim.id, "Refresh token already redeemed concurrently");
            }
            // 폐기 실패는 기록만 하고 원래 에러를 반환
            if let Err(revoke_err) = self.refresh.revoke(&pair.refresh_token).await {
                warn!(
                    user_id = claim.id,
                    error = %revoke_err,
                    "Failed to revoke refresh token issued for a rejected rotation"
                );
            }
            return Err(e);
        }

        info!(user_id = claim.id, "Refresh token rotated");
        Ok(pair)
    }
}
