use models::{Identity, LoginRequest, LoginResponse, RegisterInput};
use tracing::instrument;

use super::PortalApi;
use crate::http::{ApiError, RequestOptions};

impl PortalApi {
    /// `POST /users/login`
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.call("/users/login", RequestOptions::post_json(req)?).await
    }

    /// `POST /users`
    #[instrument(skip(self, input), fields(email = %input.email, role = %input.role))]
    pub async fn register(&self, input: &RegisterInput) -> Result<Identity, ApiError> {
        input.validate()?;
        self.call("/users", RequestOptions::post_json(input)?).await
    }
}
