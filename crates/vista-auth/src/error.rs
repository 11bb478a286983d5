use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("no embed signing key configured")]
    NoSigningKey,

    #[error("failed to issue token: {0}")]
    TokenIssue(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("session storage error: {0}")]
    Storage(#[from] vista_storage::error::StorageError),
}
