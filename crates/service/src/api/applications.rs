use models::application::{ApplicationStatus, JobApplication, NewApplication, StatusUpdate};
use tracing::instrument;

use super::PortalApi;
use crate::http::{ApiError, RequestOptions};

impl PortalApi {
    /// `POST /applications`
    #[instrument(skip(self, req), fields(job_id = req.job_id))]
    pub async fn apply(&self, req: &NewApplication) -> Result<JobApplication, ApiError> {
        self.call("/applications", RequestOptions::post_json(req)?).await
    }

    /// `GET /applications/jobseeker/{id}`
    pub async fn applications_for_job_seeker(&self, job_seeker_id: i64) -> Result<Vec<JobApplication>, ApiError> {
        self.call_list(&format!("/applications/jobseeker/{job_seeker_id}"), RequestOptions::get()).await
    }

    /// `GET /applications/job/{jobId}`
    pub async fn applications_for_job(&self, job_id: i64) -> Result<Vec<JobApplication>, ApiError> {
        self.call_list(&format!("/applications/job/{job_id}"), RequestOptions::get()).await
    }

    /// `PUT /applications/{id}/status`
    pub async fn update_application_status(&self, id: i64, status: ApplicationStatus) -> Result<JobApplication, ApiError> {
        let opts = RequestOptions::put_json(&StatusUpdate { status })?;
        self.call(&format!("/applications/{id}/status"), opts).await
    }

    /// `DELETE /applications/{id}`
    pub async fn withdraw_application(&self, id: i64) -> Result<(), ApiError> {
        self.call_empty(&format!("/applications/{id}"), RequestOptions::delete()).await
    }
}
