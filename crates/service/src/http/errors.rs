use thiserror::Error;

/// Failures of a backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

impl From<models::errors::ModelError> for ApiError {
    fn from(e: models::errors::ModelError) -> Self {
        ApiError::InvalidRequest(e.to_string())
    }
}

impl From<common::CoreError> for ApiError {
    fn from(e: common::CoreError) -> Self {
        ApiError::InvalidUrl(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_helpers() {
        let e = ApiError::Status { status: 404, body: String::new() };
        assert!(e.is_not_found());
        assert!(!e.is_unauthorized());
        assert!(ApiError::Status { status: 403, body: "no".into() }.is_unauthorized());
        assert_eq!(ApiError::Decode("x".into()).status(), None);
    }
}
