//! Authentication error types.

use larder_core::error::LarderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer credential")]
    MissingCredential,

    #[error("malformed authorization header")]
    MalformedHeader,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("credential carries no tenant")]
    MissingTenant,

    #[error("invalid tenant id: {0}")]
    InvalidTenant(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for LarderError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Crypto(msg) => LarderError::Internal(msg),
            other => LarderError::Unauthenticated {
                reason: other.to_string(),
            },
        }
    }
}
