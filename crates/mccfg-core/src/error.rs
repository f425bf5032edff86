//! 공통 에러 타입.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),

    /// 설정 소스 로드 실패
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::Config("auth.jwt_secret is empty".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: auth.jwt_secret is empty"
        );
    }
}
