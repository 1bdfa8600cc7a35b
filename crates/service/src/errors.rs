use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("schema mismatch: {0}")]
    Schema(String),
}

impl ServiceError {
    pub fn store(err: impl std::fmt::Display) -> Self { Self::Store(err.to_string()) }
}
