//! Authentication error types.

use cracare_core::error::CraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is inactive")]
    AccountInactive,

    #[error("missing bearer token")]
    MissingToken,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("password must be at least {0} characters long")]
    WeakPassword(usize),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for CraError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::AccountInactive
            | AuthError::MissingToken
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => CraError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::WeakPassword(_) => CraError::validation(err.to_string()),
            AuthError::Crypto(msg) => CraError::Crypto(msg),
        }
    }
}
