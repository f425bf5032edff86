//! 비즈니스 로직 서비스.

pub mod accounts;

pub use accounts::{AccountService, CreateUserRequest, SignUpRequest};
