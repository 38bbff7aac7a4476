use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Role of an authenticated portal user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[serde(alias = "jobseeker", alias = "job_seeker", alias = "JOBSEEKER", alias = "jobSeeker")]
    JobSeeker,
    #[serde(alias = "employer")]
    Employer,
    #[serde(alias = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::JobSeeker => "JOB_SEEKER",
            Role::Employer => "EMPLOYER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "JOB_SEEKER" | "JOBSEEKER" => Ok(Role::JobSeeker),
            "EMPLOYER" => Ok(Role::Employer),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(ModelError::UnknownVariant { kind: "role", value: s.to_string() }),
        }
    }
}

/// Account status as reported by the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[default]
    #[serde(alias = "active")]
    Active,
    #[serde(alias = "inactive")]
    Inactive,
    #[serde(alias = "suspended", alias = "BLOCKED", alias = "blocked")]
    Suspended,
}

/// Who is logged in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
}

impl Identity {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, email: String::new(), name: String::new(), role, status: UserStatus::default() }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
