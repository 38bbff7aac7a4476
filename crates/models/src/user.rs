use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::identity::{Identity, Role};

/// Payload for `POST /users/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest").field("email", &self.email).field("password", &"<redacted>").finish()
    }
}

/// Body returned by `POST /users/login`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default, alias = "accessToken", alias = "jwt")]
    pub token: Option<String>,
    #[serde(alias = "identity")]
    pub user: Identity,
}

/// Payload for `POST /users`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl std::fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl RegisterInput {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Validation("name required".into()));
        }
        if !self.email.contains('@') {
            return Err(ModelError::Validation("invalid email".into()));
        }
        if self.password.len() < 8 {
            return Err(ModelError::Validation("password must be at least 8 characters".into()));
        }
        if self.role == Role::Admin {
            return Err(ModelError::Validation("admin accounts cannot self-register".into()));
        }
        Ok(())
    }
}
