use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("widget failed to embed report: {0}")]
    Widget(String),

    #[error("surface unavailable: {0}")]
    Surface(String),
}
