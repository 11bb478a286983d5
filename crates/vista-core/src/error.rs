use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),
}
