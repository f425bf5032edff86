//! JWT 토큰 코덱.
//!
//! 신원 클레임을 HS256 compact JWT로 서명하고 검증합니다.
//!
//! jsonwebtoken의 `exp` 검증은 초 단위이므로, 검증 시 밀리초 정밀도 만료
//! 검사를 한 번 더 수행합니다. `"1ms"`로 서명된 토큰은 몇 밀리초 뒤의
//! 어떤 검증에서도 만료로 판정됩니다.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use mccfg_core::{AuthConfig, ExpiresIn, IdentityClaim};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::error::{AuthError, AuthResult};

/// 토큰 페이로드: 신원 클레임 + 발급/만료 시각 (Unix 초).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    identity: IdentityClaim,
    iat: i64,
    exp: i64,
}

/// 서명 옵션.
#[derive(Debug, Clone, Copy)]
pub struct SignOptions<'a> {
    pub secret: &'a str,
    pub expires_in: ExpiresIn,
}

/// 클레임에 서명하여 compact JWT를 반환합니다.
pub fn sign(claim: &IdentityClaim, options: SignOptions<'_>) -> AuthResult<String> {
    let key = EncodingKey::from_secret(options.secret.as_bytes());
    sign_with_key(claim, &key, options.expires_in, Utc::now().timestamp_millis())
}

/// 토큰을 검증하고 서명 당시의 클레임을 그대로 반환합니다.
///
/// - 서명 불일치, 구조 오류 → [`AuthError::TokenInvalid`]
/// - 현재 시각(ms)이 만료 시각 이상 → [`AuthError::TokenExpired`]
pub fn verify(token: &str, secret: &str) -> AuthResult<IdentityClaim> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    verify_with_key(token, &key, Utc::now().timestamp_millis())
}

fn sign_with_key(
    claim: &IdentityClaim,
    key: &EncodingKey,
    expires_in: ExpiresIn,
    now_ms: i64,
) -> AuthResult<String> {
    let claims = Claims {
        identity: claim.clone(),
        iat: now_ms.div_euclid(1_000),
        exp: (now_ms + expires_in.as_millis()).div_euclid(1_000),
    };

    Ok(encode(&Header::new(Algorithm::HS256), &claims, key)?)
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation
}

fn verify_with_key(token: &str, key: &DecodingKey, now_ms: i64) -> AuthResult<IdentityClaim> {
    let data = decode::<Claims>(token, key, &validation()).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    })?;

    if now_ms >= data.claims.exp.saturating_mul(1_000) {
        return Err(AuthError::TokenExpired);
    }

    Ok(data.claims.identity)
}

/// 설정된 시크릿과 만료 기간을 보관하는 코덱.
///
/// [`AuthConfig`]에서 한 번 생성되어 발급기와 가드에 공유됩니다.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expires_in: ExpiresIn,
}

impl TokenCodec {
    pub fn new(secret: &str, expires_in: ExpiresIn) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        }
    }

    /// 인증 설정에서 코덱 생성. 만료 기간이 잘못되면 설정 에러입니다.
    pub fn from_config(config: &AuthConfig) -> mccfg_core::CoreResult<Self> {
        Ok(Self::new(
            config.jwt_secret.expose_secret(),
            config.expires_in()?,
        ))
    }

    pub fn expires_in(&self) -> ExpiresIn {
        self.expires_in
    }

    pub fn sign(&self, claim: &IdentityClaim) -> AuthResult<String> {
        sign_with_key(
            claim,
            &self.encoding,
            self.expires_in,
            Utc::now().timestamp_millis(),
        )
    }

    pub fn verify(&self, token: &str) -> AuthResult<IdentityClaim> {
        verify_with_key(token, &self.decoding, Utc::now().timestamp_millis())
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mccfg_core::Role;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn claim() -> IdentityClaim {
        IdentityClaim {
            id: 42,
            username: "alex".to_string(),
            email: "alex@example.com".to_string(),
            role: Role::Write,
        }
    }

    fn options(expires: &str) -> SignOptions<'static> {
        SignOptions {
            secret: TEST_SECRET,
            expires_in: expires.parse().unwrap(),
        }
    }

    #[test]
    fn test_sign_and_verify_round_trip() {
        let token = sign(&claim(), options("3m")).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let decoded = verify(&token, TEST_SECRET).unwrap();
        assert_eq!(decoded, claim());
    }

    #[tokio::test]
    async fn test_one_millisecond_token_expires() {
        let token = sign(&claim(), options("1ms")).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        assert!(matches!(
            verify(&token, TEST_SECRET),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_expiry_boundary_is_millisecond_precise() {
        let key = EncodingKey::from_secret(TEST_SECRET.as_bytes());
        let decoding = DecodingKey::from_secret(TEST_SECRET.as_bytes());
        let now_ms = Utc::now().timestamp_millis();
        let token = sign_with_key(&claim(), &key, "10s".parse().unwrap(), now_ms).unwrap();

        let exp_ms = (now_ms + 10_000).div_euclid(1_000) * 1_000;
        assert!(verify_with_key(&token, &decoding, exp_ms - 1).is_ok());
        assert!(matches!(
            verify_with_key(&token, &decoding, exp_ms),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = sign(&claim(), options("3m")).unwrap();
        let result = verify(&token, "wrong-secret-key-for-testing-minimum-32-chars");
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert!(matches!(
            verify("invalid.token.here", TEST_SECRET),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_codec_uses_configured_expiry() {
        let config = AuthConfig::new(TEST_SECRET, "2h");
        let codec = TokenCodec::from_config(&config).unwrap();
        assert_eq!(codec.expires_in().as_secs(), 7_200);

        let token = codec.sign(&claim()).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), claim());
        assert_eq!(verify(&token, TEST_SECRET).unwrap(), claim());
    }

    #[test]
    fn test_codec_rejects_bad_expiry_config() {
        let config = AuthConfig::new(TEST_SECRET, "later");
        assert!(TokenCodec::from_config(&config).is_err());

        let config = AuthConfig::new(TEST_SECRET, "9223372036854775807");
        assert!(TokenCodec::from_config(&config).is_err());
    }

    #[test]
    fn test_longest_expiry_signs_valid_token() {
        let config = AuthConfig::new(TEST_SECRET, "100y");
        let codec = TokenCodec::from_config(&config).unwrap();

        let token = codec.sign(&claim()).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), claim());
    }
}
