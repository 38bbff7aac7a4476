use models::job::{Job, JobSearch, NewJob};
use models::saved_job::{SaveJob, SavedJob};

use super::PortalApi;
use crate::http::{ApiError, RequestOptions};
use crate::pagination::Pagination;

impl PortalApi {
    /// `GET /jobs`
    pub async fn list_jobs(&self, page: Pagination) -> Result<Vec<Job>, ApiError> {
        self.call_list("/jobs", RequestOptions::get().with_query(page.to_query())).await
    }

    /// `GET /jobs/search`
    pub async fn search_jobs(&self, search: &JobSearch) -> Result<Vec<Job>, ApiError> {
        self.call_list("/jobs/search", RequestOptions::get().with_query(search.to_query())).await
    }

    /// `GET /jobs/{id}`
    pub async fn job(&self, id: i64) -> Result<Job, ApiError> {
        self.call(&format!("/jobs/{id}"), RequestOptions::get()).await
    }

    /// `POST /jobs`
    pub async fn create_job(&self, job: &NewJob) -> Result<Job, ApiError> {
        job.validate()?;
        self.call("/jobs", RequestOptions::post_json(job)?).await
    }

    /// `GET /jobs/employer/{employerId}`
    pub async fn jobs_by_employer(&self, employer_id: i64) -> Result<Vec<Job>, ApiError> {
        self.call_list(&format!("/jobs/employer/{employer_id}"), RequestOptions::get()).await
    }

    /// `GET /saved-jobs/jobseeker/{id}`
    pub async fn saved_jobs(&self, job_seeker_id: i64) -> Result<Vec<SavedJob>, ApiError> {
        self.call_list(&format!("/saved-jobs/jobseeker/{job_seeker_id}"), RequestOptions::get()).await
    }

    /// `POST /saved-jobs`
    pub async fn save_job(&self, req: &SaveJob) -> Result<SavedJob, ApiError> {
        self.call("/saved-jobs", RequestOptions::post_json(req)?).await
    }

    /// `DELETE /saved-jobs/{id}`
    pub async fn unsave_job(&self, saved_job_id: i64) -> Result<(), ApiError> {
        self.call_empty(&format!("/saved-jobs/{saved_job_id}"), RequestOptions::delete()).await
    }
}
