use serde::{Deserialize, Serialize};

use crate::identity::Role;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionType {
    #[default]
    #[serde(alias = "free")]
    Free,
    #[serde(alias = "premium")]
    Premium,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    #[default]
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "approved")]
    Approved,
    #[serde(alias = "rejected")]
    Rejected,
}

/// A role-specific profile slice of the session.
pub trait RoleProfile {
    /// The only identity role allowed to carry this profile.
    const ROLE: Role;

    /// Owning user, when the backend reported it.
    fn owner_user_id(&self) -> Option<i64>;

    fn subscription_type(&self) -> SubscriptionType;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSeekerProfile {
    pub job_seeker_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub subscription_type: SubscriptionType,
}

impl JobSeekerProfile {
    pub fn new(job_seeker_id: i64) -> Self {
        Self { job_seeker_id, ..Default::default() }
    }
}

impl RoleProfile for JobSeekerProfile {
    const ROLE: Role = Role::JobSeeker;

    fn owner_user_id(&self) -> Option<i64> {
        self.user_id
    }

    fn subscription_type(&self) -> SubscriptionType {
        self.subscription_type
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerProfile {
    pub employer_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub subscription_type: SubscriptionType,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
}

impl EmployerProfile {
    pub fn new(employer_id: i64) -> Self {
        Self { employer_id, ..Default::default() }
    }

    /// Employers may only post jobs once an admin approved them.
    pub fn can_post_jobs(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved
    }
}

impl RoleProfile for EmployerProfile {
    const ROLE: Role = Role::Employer;

    fn owner_user_id(&self) -> Option<i64> {
        self.user_id
    }

    fn subscription_type(&self) -> SubscriptionType {
        self.subscription_type
    }
}
