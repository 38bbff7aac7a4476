use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::SubscriptionType;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub plan: SubscriptionType,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub plan: SubscriptionType,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub duration_days: u32,
}

pub(crate) fn default_currency() -> String {
    "INR".into()
}

/// Payload for `POST /subscriptions/upgrade`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeRequest {
    pub user_id: i64,
    pub plan: SubscriptionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<i64>,
}
