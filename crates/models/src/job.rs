use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Open,
    Closed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub employer_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /jobs`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub employer_id: i64,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub job_type: JobType,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub skills: Vec<String>,
}

impl NewJob {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.title.trim().is_empty() {
            return Err(ModelError::Validation("title required".into()));
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(ModelError::Validation("salary_min must not exceed salary_max".into()));
            }
        }
        Ok(())
    }
}

/// Query for `GET /jobs/search`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobSearch {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl JobSearch {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self { keyword: Some(keyword.into()), ..Default::default() }
    }

    /// Query pairs, skipping unset and blank filters.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut q = Vec::new();
        if let Some(k) = self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            q.push(("keyword", k.to_string()));
        }
        if let Some(l) = self.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            q.push(("location", l.to_string()));
        }
        if let Some(t) = self.job_type {
            // serde renders the wire name as a JSON string
            if let Ok(serde_json::Value::String(s)) = serde_json::to_value(t) {
                q.push(("jobType", s));
            }
        }
        if let Some(p) = self.page {
            q.push(("page", p.to_string()));
        }
        if let Some(s) = self.size {
            q.push(("size", s.clamp(1, 100).to_string()));
        }
        q
    }
}
