use serde::{Deserialize, Serialize};

/// Counters returned by `GET /admin/analytics`; missing counters read as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminAnalytics {
    pub total_users: u64,
    pub total_job_seekers: u64,
    pub total_employers: u64,
    pub total_jobs: u64,
    pub total_applications: u64,
    pub pending_employers: u64,
    pub premium_subscriptions: u64,
}
