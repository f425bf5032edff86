//! 도메인 모델.

pub mod role;
pub mod tokens;
pub mod user;

pub use role::Role;
pub use tokens::{ConfirmationToken, NewConfirmationToken, RefreshTokenRecord, RefreshTokenWithUser};
pub use user::{Identity, IdentityClaim, NewUser, User, UserDto};
