//! 인증/인가 에러.
//!
//! 각 실패는 감지된 지점에서 한 번 발생하며 재시도 없이 해당 요청에만 적용됩니다.

use std::fmt;

use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ApiErrorResponse;
use crate::repository::StoreError;

/// 존재하지 않는 사용자를 가리키는 방법.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    Id(i32),
    Username(String),
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRef::Id(id) => write!(f, "User with id: {} not found!", id),
            UserRef::Username(name) => write!(f, "User with username: {} does not exist!", name),
        }
    }
}

/// 인증 에러.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing access token!")]
    MissingToken,
    #[error("Invalid token type!")]
    InvalidTokenType,
    #[error("Token is not a type of JWT!")]
    MalformedToken,
    #[error("Token is invalid")]
    TokenInvalid,
    #[error("Token is expired")]
    TokenExpired,
    #[error("{0}")]
    UserNotFound(UserRef),
    #[error("Account is not verified. Please check your inbox!")]
    AccountNotVerified,
    #[error("Invalid password")]
    InvalidCredentials,
    #[error("Invalid refresh token!")]
    InvalidRefreshToken,
    #[error("User is not authorized. Missing user data!")]
    UnauthorizedNoIdentity,
    #[error("User does not have enough grants to proceed!")]
    InsufficientGrants,

    #[error("Username {0} is already taken!")]
    UsernameTaken(String),
    #[error("Email {0} is already taken!")]
    EmailTaken(String),
    #[error("Confirmation token is invalid")]
    ConfirmationTokenInvalid,
    #[error("Confirmation token is expired")]
    ConfirmationTokenExpired,
    #[error("Token has no binded user!")]
    ConfirmationTokenNoUser,
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("password hashing failed")]
    PasswordHashing,
    #[error("token signing failed: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl AuthError {
    /// 응답 본문에 쓰이는 에러 코드. 메트릭 라벨로도 사용됩니다.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::InvalidTokenType => "INVALID_TOKEN_TYPE",
            AuthError::MalformedToken => "MALFORMED_TOKEN",
            AuthError::TokenInvalid => "TOKEN_INVALID",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::UserNotFound(_) => "USER_NOT_FOUND",
            AuthError::AccountNotVerified => "ACCOUNT_NOT_VERIFIED",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            AuthError::UnauthorizedNoIdentity => "UNAUTHORIZED_NO_IDENTITY",
            AuthError::InsufficientGrants => "INSUFFICIENT_GRANTS",
            AuthError::UsernameTaken(_) => "USERNAME_TAKEN",
            AuthError::EmailTaken(_) => "EMAIL_TAKEN",
            AuthError::ConfirmationTokenInvalid => "CONFIRMATION_TOKEN_INVALID",
            AuthError::ConfirmationTokenExpired => "CONFIRMATION_TOKEN_EXPIRED",
            AuthError::ConfirmationTokenNoUser => "CONFIRMATION_TOKEN_NO_USER",
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::PasswordHashing => "PASSWORD_HASHING",
            AuthError::TokenSigning(_) => "TOKEN_SIGNING",
            AuthError::Storage(_) => "STORAGE_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidTokenType
            | AuthError::MalformedToken
            | AuthError::TokenInvalid
            | AuthError::TokenExpired
            | AuthError::AccountNotVerified
            | AuthError::InvalidCredentials
            | AuthError::InvalidRefreshToken
            | AuthError::UnauthorizedNoIdentity => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound(_) | AuthError::ConfirmationTokenInvalid => {
                StatusCode::NOT_FOUND
            }
            AuthError::InsufficientGrants => StatusCode::FORBIDDEN,
            AuthError::UsernameTaken(_) | AuthError::EmailTaken(_) => StatusCode::CONFLICT,
            AuthError::ConfirmationTokenExpired
            | AuthError::ConfirmationTokenNoUser
            | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::PasswordHashing | AuthError::TokenSigning(_) | AuthError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn is_internal(&self) -> bool {
        self.status() == StatusCode::INTERNAL_SERVER_ERROR
    }

    /// 응답 본문. 내부 에러의 상세 내용은 로그에만 남습니다.
    pub fn to_body(&self) -> ApiErrorResponse {
        if self.is_internal() {
            tracing::error!(code = self.code(), error = %self, "Internal auth failure");
            ApiErrorResponse::new(self.code(), "Internal server error")
        } else {
            ApiErrorResponse::new(self.code(), self.to_string())
        }
    }

    /// 요청 메서드와 경로가 포함된 응답.
    pub fn into_response_for(self, method: &Method, uri: &Uri) -> Response {
        crate::metrics::record_auth_rejection(self.code());
        let body = self.to_body().with_request_info(method, uri);
        (self.status(), Json(body)).into_response()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        crate::metrics::record_auth_rejection(self.code());
        (self.status(), Json(self.to_body())).into_response()
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::Validation(errors.to_string())
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
