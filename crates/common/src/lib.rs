//! Shared helpers for the job portal workspace: logging setup, runtime
//! environment checks and URL composition used by the HTTP layer.

use thiserror::Error;

pub mod env;
pub mod url;
pub mod utils;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_error_display() {
        let e = CoreError::InvalidBaseUrl("ftp://x".into());
        assert_eq!(e.to_string(), "invalid base url: ftp://x");
    }
}
