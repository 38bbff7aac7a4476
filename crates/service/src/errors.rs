use thiserror::Error;

/// Failures of the durable store backing the session mirror.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage error: {0}")]
    Store(String),
}

impl ServiceError {
    pub fn store(err: impl std::fmt::Display) -> Self { Self::Store(err.to_string()) }
}
