use models::{EmployerProfile, JobSeekerProfile};
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use super::PortalApi;
use crate::http::{ApiError, RequestOptions};

impl PortalApi {
    /// `GET /jobseekers/user/{userId}`; `None` when the user has no profile yet.
    #[instrument(skip(self))]
    pub async fn job_seeker_by_user(&self, user_id: i64) -> Result<Option<JobSeekerProfile>, ApiError> {
        self.call_optional(&format!("/jobseekers/user/{user_id}"), RequestOptions::get()).await
    }

    /// `POST /jobseekers`
    pub async fn create_job_seeker(&self, profile: &JobSeekerProfile) -> Result<JobSeekerProfile, ApiError> {
        self.call("/jobseekers", RequestOptions::post_json(profile)?).await
    }

    /// `PUT /jobseekers/{id}`
    pub async fn update_job_seeker(&self, profile: &JobSeekerProfile) -> Result<JobSeekerProfile, ApiError> {
        let path = format!("/jobseekers/{}", profile.job_seeker_id);
        self.call(&path, RequestOptions::put_json(profile)?).await
    }

    /// `POST /jobseekers/{id}/resume` as `multipart/form-data` with a `file` part.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_resume(&self, job_seeker_id: i64, file_name: &str, bytes: Vec<u8>) -> Result<JobSeekerProfile, ApiError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        self.call(&format!("/jobseekers/{job_seeker_id}/resume"), RequestOptions::multipart(form)).await
    }

    /// `GET /employers/user/{userId}`; `None` when the user has no profile yet.
    #[instrument(skip(self))]
    pub async fn employer_by_user(&self, user_id: i64) -> Result<Option<EmployerProfile>, ApiError> {
        self.call_optional(&format!("/employers/user/{user_id}"), RequestOptions::get()).await
    }

    /// `POST /employers`
    pub async fn create_employer(&self, profile: &EmployerProfile) -> Result<EmployerProfile, ApiError> {
        self.call("/employers", RequestOptions::post_json(profile)?).await
    }

    /// `PUT /employers/{id}`
    pub async fn update_employer(&self, profile: &EmployerProfile) -> Result<EmployerProfile, ApiError> {
        let path = format!("/employers/{}", profile.employer_id);
        self.call(&path, RequestOptions::put_json(profile)?).await
    }
}
