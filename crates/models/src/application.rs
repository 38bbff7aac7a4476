use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Shortlisted,
    Rejected,
    Hired,
    Withdrawn,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: i64,
    pub job_id: i64,
    pub job_seeker_id: i64,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /applications`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub job_id: i64,
    pub job_seeker_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
}

/// Payload for `PUT /applications/{id}/status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}
