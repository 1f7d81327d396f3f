use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed schedule file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no entry with id {id}")]
    NotFound { id: Uuid },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
