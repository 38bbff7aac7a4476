use models::admin::AdminAnalytics;
use models::EmployerProfile;
use tracing::instrument;

use super::PortalApi;
use crate::http::{ApiError, RequestOptions};

impl PortalApi {
    /// `GET /admin/analytics`
    pub async fn analytics(&self) -> Result<AdminAnalytics, ApiError> {
        self.call("/admin/analytics", RequestOptions::get()).await
    }

    /// `GET /admin/employers/pending`
    pub async fn pending_employers(&self) -> Result<Vec<EmployerProfile>, ApiError> {
        self.call_list("/admin/employers/pending", RequestOptions::get()).await
    }

    /// `PUT /admin/employers/{id}/approve`
    #[instrument(skip(self))]
    pub async fn approve_employer(&self, employer_id: i64) -> Result<EmployerProfile, ApiError> {
        self.call(&format!("/admin/employers/{employer_id}/approve"), RequestOptions::put()).await
    }

    /// `PUT /admin/employers/{id}/reject`
    #[instrument(skip(self))]
    pub async fn reject_employer(&self, employer_id: i64) -> Result<EmployerProfile, ApiError> {
        self.call(&format!("/admin/employers/{employer_id}/reject"), RequestOptions::put()).await
    }
}
