use models::Identity;
use serde::{Deserialize, Serialize};

use crate::session::PersistReport;

pub use models::{LoginRequest, LoginResponse, RegisterInput};

/// Login input
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginInput").field("email", &self.email).finish_non_exhaustive()
    }
}

impl From<LoginInput> for LoginRequest {
    fn from(input: LoginInput) -> Self {
        LoginRequest { email: input.email, password: input.password }
    }
}

/// What happened to the role profile after a login or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileLoad {
    /// Fetched and applied to the session.
    Loaded,
    /// The backend has no profile for this user yet.
    Missing,
    /// The role has no profile (admins).
    NotApplicable,
    /// Fetched, but the session moved on meanwhile (logout or another login).
    Discarded,
    /// The fetch failed; the session keeps the identity without a profile.
    Failed(String),
}

/// Login result
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub identity: Identity,
    pub profile: ProfileLoad,
    /// Durable-store warnings collected along the way.
    pub persist: PersistReport,
}
