//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반. 솔트는 사용자 레코드의 별도 컬럼에 저장되며,
//! 해시(PHC 문자열)에 포함된 솔트와 일치해야 검증에 성공합니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호 검증 실패")]
    VerificationFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
    #[error("잘못된 솔트 형식")]
    InvalidSalt,
}

/// 새 솔트 생성 (B64 문자열).
pub fn generate_salt() -> String {
    SaltString::generate(&mut OsRng).as_str().to_string()
}

/// 주어진 솔트로 비밀번호를 해싱합니다.
///
/// # Returns
///
/// PHC 형식의 해시 문자열 (`$argon2id$v=19$...`)
pub fn hash_password(password: &str, salt: &str) -> Result<String, PasswordError> {
    let salt = SaltString::from_b64(salt).map_err(|_| PasswordError::InvalidSalt)?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 저장된 솔트와 해시로 비밀번호를 검증합니다.
pub fn verify_password(password: &str, salt: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    match parsed_hash.salt {
        Some(embedded) if embedded.as_str() == salt => {}
        _ => return Err(PasswordError::VerificationFailed),
    }

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// 새 솔트로 해싱합니다. blocking 풀에서 실행됩니다.
///
/// # Returns
///
/// `(salt, hash)`
pub async fn hash_with_new_salt(password: String) -> Result<(String, String), PasswordError> {
    tokio::task::spawn_blocking(move || {
        let salt = generate_salt();
        let hash = hash_password(&password, &salt)?;
        Ok::<_, PasswordError>((salt, hash))
    })
    .await
    .map_err(|_| PasswordError::HashingFailed)?
}

/// [`verify_password`]를 blocking 풀에서 실행합니다.
pub async fn verify_password_blocking(
    password: String,
    salt: String,
    hash: String,
) -> Result<(), PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &salt, &hash))
        .await
        .map_err(|_| PasswordError::HashingFailed)?
}
