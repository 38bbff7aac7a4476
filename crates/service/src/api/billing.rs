//! Subscriptions and payments.

use models::payment::{NewPayment, Payment, PaymentVerification};
use models::subscription::{Subscription, SubscriptionPlan, UpgradeRequest};
use tracing::instrument;

use super::PortalApi;
use crate::http::{ApiError, RequestOptions};

impl PortalApi {
    /// `GET /subscriptions/user/{userId}`; `None` when the user never subscribed.
    pub async fn subscription_for_user(&self, user_id: i64) -> Result<Option<Subscription>, ApiError> {
        self.call_optional(&format!("/subscriptions/user/{user_id}"), RequestOptions::get()).await
    }

    /// `GET /subscriptions/plans`
    pub async fn subscription_plans(&self) -> Result<Vec<SubscriptionPlan>, ApiError> {
        self.call_list("/subscriptions/plans", RequestOptions::get()).await
    }

    /// `POST /subscriptions/upgrade`
    #[instrument(skip(self, req), fields(user_id = req.user_id, plan = ?req.plan))]
    pub async fn upgrade_subscription(&self, req: &UpgradeRequest) -> Result<Subscription, ApiError> {
        self.call("/subscriptions/upgrade", RequestOptions::post_json(req)?).await
    }

    /// `POST /payments`
    #[instrument(skip(self, req), fields(user_id = req.user_id, amount = req.amount))]
    pub async fn create_payment(&self, req: &NewPayment) -> Result<Payment, ApiError> {
        req.validate()?;
        self.call("/payments", RequestOptions::post_json(req)?).await
    }

    /// `GET /payments/user/{userId}`
    pub async fn payments_for_user(&self, user_id: i64) -> Result<Vec<Payment>, ApiError> {
        self.call_list(&format!("/payments/user/{user_id}"), RequestOptions::get()).await
    }

    /// `PUT /payments/{id}/verify`
    pub async fn verify_payment(&self, id: i64, verification: &PaymentVerification) -> Result<Payment, ApiError> {
        self.call(&format!("/payments/{id}/verify"), RequestOptions::put_json(verification)?).await
    }
}
