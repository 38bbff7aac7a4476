use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::profile::SubscriptionType;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    #[serde(alias = "COMPLETED")]
    Success,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    #[serde(default = "crate::subscription::default_currency")]
    pub currency: String,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub plan: Option<SubscriptionType>,
    #[serde(default)]
    pub transaction_ref: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /payments`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub user_id: i64,
    pub amount: f64,
    pub currency: String,
    pub plan: SubscriptionType,
}

impl NewPayment {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(ModelError::Validation("amount must be positive".into()));
        }
        if self.currency.trim().len() != 3 {
            return Err(ModelError::Validation("currency must be a 3-letter code".into()));
        }
        Ok(())
    }
}

/// Payload for `PUT /payments/{id}/verify`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    pub transaction_ref: String,
}
