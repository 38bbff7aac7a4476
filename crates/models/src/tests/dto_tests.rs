use serde_json::json;

use crate::admin::AdminAnalytics;
use crate::application::{ApplicationStatus, JobApplication};
use crate::job::{Job, JobSearch, JobStatus, JobType, NewJob};
use crate::payment::{NewPayment, Payment, PaymentStatus};
use crate::profile::SubscriptionType;

#[test]
fn job_decodes_with_defaults() -> anyhow::Result<()> {
    let job: Job = serde_json::from_value(json!({
        "id": 1, "employerId": 42, "title": "Rust Engineer",
        "postedAt": "2026-01-05T10:00:00Z"
    }))?;
    assert_eq!(job.job_type, JobType::FullTime);
    assert_eq!(job.status, JobStatus::Open);
    assert!(job.posted_at.is_some());
    Ok(())
}

#[test]
fn new_job_validation() {
    let mut job = NewJob {
        employer_id: 42,
        title: "Backend".into(),
        description: String::new(),
        location: None,
        job_type: JobType::Remote,
        salary_min: Some(10),
        salary_max: Some(5),
        skills: vec![],
    };
    assert!(job.validate().is_err());
    job.salary_max = Some(20);
    assert!(job.validate().is_ok());
    job.title = "  ".into();
    assert!(job.validate().is_err());
}

#[test]
fn job_search_skips_blank_filters() {
    let q = JobSearch {
        keyword: Some(" rust ".into()),
        location: Some("".into()),
        job_type: Some(JobType::PartTime),
        page: Some(2),
        size: Some(500),
    }
    .to_query();
    assert_eq!(
        q,
        vec![
            ("keyword", "rust".to_string()),
            ("jobType", "PART_TIME".to_string()),
            ("page", "2".to_string()),
            ("size", "100".to_string()),
        ]
    );
    assert!(JobSearch::default().to_query().is_empty());
}

#[test]
fn application_status_wire_names() -> anyhow::Result<()> {
    let app: JobApplication = serde_json::from_value(json!({"id": 3, "jobId": 1, "jobSeekerId": 9, "status": "SHORTLISTED"}))?;
    assert_eq!(app.status, ApplicationStatus::Shortlisted);
    Ok(())
}

#[test]
fn payment_status_accepts_completed_alias() -> anyhow::Result<()> {
    let p: Payment = serde_json::from_value(json!({"id": 5, "userId": 7, "amount": 499.0, "status": "COMPLETED"}))?;
    assert_eq!(p.status, PaymentStatus::Success);
    assert_eq!(p.currency, "INR");
    Ok(())
}

#[test]
fn new_payment_validation() {
    let ok = NewPayment { user_id: 7, amount: 499.0, currency: "INR".into(), plan: SubscriptionType::Premium };
    assert!(ok.validate().is_ok());
    let zero = NewPayment { amount: 0.0, ..ok.clone() };
    assert!(zero.validate().is_err());
    let bad_currency = NewPayment { currency: "RUPEE".into(), ..ok };
    assert!(bad_currency.validate().is_err());
}

#[test]
fn analytics_missing_counters_are_zero() -> anyhow::Result<()> {
    let a: AdminAnalytics = serde_json::from_value(json!({"totalUsers": 10}))?;
    assert_eq!(a.total_users, 10);
    assert_eq!(a.pending_employers, 0);
    Ok(())
}

#[test]
fn login_response_accepts_token_aliases() -> anyhow::Result<()> {
    use crate::{LoginResponse, Role};
    let r: LoginResponse = serde_json::from_value(json!({
        "accessToken": "tok123",
        "user": {"userId": 7, "email": "e@x.io", "role": "EMPLOYER"}
    }))?;
    assert_eq!(r.token.as_deref(), Some("tok123"));
    assert_eq!(r.user.role, Role::Employer);
    let r: LoginResponse = serde_json::from_value(json!({"user": {"userId": 1, "role": "ADMIN"}}))?;
    assert!(r.token.is_none());
    Ok(())
}

#[test]
fn register_input_validation() {
    use crate::{RegisterInput, Role};
    let mut input = RegisterInput {
        name: "Jo".into(),
        email: "jo@x.io".into(),
        password: "longenough".into(),
        role: Role::JobSeeker,
    };
    assert!(input.validate().is_ok());
    input.password = "short".into();
    assert!(input.validate().is_err());
    input.password = "longenough".into();
    input.role = Role::Admin;
    assert!(input.validate().is_err());
    // password never shows up in logs
    assert!(!format!("{input:?}").contains("longenough"));
}
