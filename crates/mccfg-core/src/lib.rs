//! # MC cfg Core
//!
//! 모드 설정 카탈로그 서비스의 핵심 도메인 모델 및 공통 인프라를 제공합니다.
//!
//! - 사용자, 역할, 토큰 레코드 등 도메인 타입
//! - 설정 관리 (파일 + 환경 변수)
//! - 토큰 만료 기간 파싱 (`"3m"`, `"1ms"` 등)
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod duration;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use duration::{DurationParseError, ExpiresIn};
pub use error::*;
pub use logging::*;
