use thiserror::Error;

use crate::http::ApiError;
use crate::session::SessionError;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("user already exists")]
    Conflict,
    #[error("not found")]
    NotFound,
    #[error("invalid credentials")]
    Unauthorized,
    #[error("no user is logged in")]
    NotLoggedIn,
    #[error("backend error: {0}")]
    Api(ApiError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Conflict => 1002,
            AuthError::NotFound => 1003,
            AuthError::Unauthorized => 1004,
            AuthError::NotLoggedIn => 1005,
            AuthError::Api(_) => 1100,
            AuthError::Session(_) => 1200,
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::InvalidRequest(msg) => AuthError::Validation(msg),
            ApiError::Status { status: 400, body } => AuthError::Validation(body),
            ApiError::Status { status: 401 | 403, .. } => AuthError::Unauthorized,
            ApiError::Status { status: 404, .. } => AuthError::NotFound,
            ApiError::Status { status: 409, .. } => AuthError::Conflict,
            other => AuthError::Api(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_statuses_map_to_codes() {
        let status = |status: u16| AuthError::from(ApiError::Status { status, body: "x".into() });
        assert_eq!(status(401).code(), 1004);
        assert_eq!(status(409).code(), 1002);
        assert!(matches!(status(400), AuthError::Validation(b) if b == "x"));
        assert_eq!(status(500).code(), 1100);
        assert_eq!(AuthError::from(SessionError::NotLoggedIn).code(), 1200);
    }
}
