use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJob {
    pub id: i64,
    pub job_seeker_id: i64,
    pub job_id: i64,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /saved-jobs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveJob {
    pub job_seeker_id: i64,
    pub job_id: i64,
}
