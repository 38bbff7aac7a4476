use async_trait::async_trait;
use models::subscription::{Subscription, UpgradeRequest};
use models::{EmployerProfile, Identity, JobSeekerProfile, LoginRequest, LoginResponse, RegisterInput};

use crate::api::PortalApi;
use crate::http::ApiError;

/// Backend calls the auth flows depend on.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn register(&self, input: &RegisterInput) -> Result<Identity, ApiError>;

    async fn job_seeker_profile(&self, user_id: i64) -> Result<Option<JobSeekerProfile>, ApiError>;
    async fn employer_profile(&self, user_id: i64) -> Result<Option<EmployerProfile>, ApiError>;

    /// Create when the id is `0`, update otherwise.
    async fn save_job_seeker_profile(&self, profile: &JobSeekerProfile) -> Result<JobSeekerProfile, ApiError>;
    /// Create when the id is `0`, update otherwise.
    async fn save_employer_profile(&self, profile: &EmployerProfile) -> Result<EmployerProfile, ApiError>;

    async fn upgrade_subscription(&self, req: &UpgradeRequest) -> Result<Subscription, ApiError>;
}

#[async_trait]
impl AuthBackend for PortalApi {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        PortalApi::login(self, req).await
    }

    async fn register(&self, input: &RegisterInput) -> Result<Identity, ApiError> {
        PortalApi::register(self, input).await
    }

    async fn job_seeker_profile(&self, user_id: i64) -> Result<Option<JobSeekerProfile>, ApiError> {
        self.job_seeker_by_user(user_id).await
    }

    async fn employer_profile(&self, user_id: i64) -> Result<Option<EmployerProfile>, ApiError> {
        self.employer_by_user(user_id).await
    }

    async fn save_job_seeker_profile(&self, profile: &JobSeekerProfile) -> Result<JobSeekerProfile, ApiError> {
        if profile.job_seeker_id == 0 {
            self.create_job_seeker(profile).await
        } else {
            self.update_job_seeker(profile).await
        }
    }

    async fn save_employer_profile(&self, profile: &EmployerProfile) -> Result<EmployerProfile, ApiError> {
        if profile.employer_id == 0 {
            self.create_employer(profile).await
        } else {
            self.update_employer(profile).await
        }
    }

    async fn upgrade_subscription(&self, req: &UpgradeRequest) -> Result<Subscription, ApiError> {
        PortalApi::upgrade_subscription(self, req).await
    }
}

/// Simple in-memory mock backend for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::{Mutex, MutexGuard};
    use std::time::Duration;

    struct Account {
        password: String,
        identity: Identity,
    }

    #[derive(Default)]
    pub struct MockAuthBackend {
        accounts: Mutex<HashMap<String, Account>>,       // key: email
        job_seekers: Mutex<HashMap<i64, JobSeekerProfile>>, // key: user_id
        employers: Mutex<HashMap<i64, EmployerProfile>>,    // key: user_id
        next_id: AtomicI64,
        profile_delay: Mutex<Option<Duration>>,
    }

    fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn status(status: u16, body: &str) -> ApiError {
        ApiError::Status { status, body: body.to_string() }
    }

    impl MockAuthBackend {
        pub fn new() -> Self {
            Self { next_id: AtomicI64::new(100), ..Default::default() }
        }

        fn next_id(&self) -> i64 {
            self.next_id.fetch_add(1, Ordering::SeqCst).max(1)
        }

        pub fn with_account(self, password: &str, identity: Identity) -> Self {
            lock(&self.accounts).insert(identity.email.clone(), Account { password: password.to_string(), identity });
            self
        }

        pub fn with_job_seeker_profile(self, user_id: i64, profile: JobSeekerProfile) -> Self {
            lock(&self.job_seekers).insert(user_id, profile);
            self
        }

        pub fn with_employer_profile(self, user_id: i64, profile: EmployerProfile) -> Self {
            lock(&self.employers).insert(user_id, profile);
            self
        }

        /// Delay every profile lookup, to widen the window between login and profile apply.
        pub fn set_profile_delay(&self, delay: Duration) {
            *lock(&self.profile_delay) = Some(delay);
        }

        async fn pause(&self) {
            let delay = *lock(&self.profile_delay);
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
        }
    }

    #[async_trait]
    impl AuthBackend for MockAuthBackend {
        async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
            let accounts = lock(&self.accounts);
            match accounts.get(&req.email) {
                Some(a) if a.password == req.password => Ok(LoginResponse {
                    token: Some(format!("token-{}", a.identity.user_id)),
                    user: a.identity.clone(),
                }),
                _ => Err(status(401, "invalid credentials")),
            }
        }

        async fn register(&self, input: &RegisterInput) -> Result<Identity, ApiError> {
            input.validate()?;
            if lock(&self.accounts).contains_key(&input.email) {
                return Err(status(409, "email already registered"));
            }
            let identity = Identity::new(self.next_id(), input.role).with_email(&input.email).with_name(&input.name);
            lock(&self.accounts)
                .insert(input.email.clone(), Account { password: input.password.clone(), identity: identity.clone() });
            Ok(identity)
        }

        async fn job_seeker_profile(&self, user_id: i64) -> Result<Option<JobSeekerProfile>, ApiError> {
            self.pause().await;
            Ok(lock(&self.job_seekers).get(&user_id).cloned())
        }

        async fn employer_profile(&self, user_id: i64) -> Result<Option<EmployerProfile>, ApiError> {
            self.pause().await;
            Ok(lock(&self.employers).get(&user_id).cloned())
        }

        async fn save_job_seeker_profile(&self, profile: &JobSeekerProfile) -> Result<JobSeekerProfile, ApiError> {
            let user_id = profile.user_id.ok_or_else(|| status(400, "userId required"))?;
            let mut saved = profile.clone();
            if saved.job_seeker_id == 0 {
                saved.job_seeker_id = self.next_id();
            }
            lock(&self.job_seekers).insert(user_id, saved.clone());
            Ok(saved)
        }

        async fn save_employer_profile(&self, profile: &EmployerProfile) -> Result<EmployerProfile, ApiError> {
            let user_id = profile.user_id.ok_or_else(|| status(400, "userId required"))?;
            let mut saved = profile.clone();
            if saved.employer_id == 0 {
                saved.employer_id = self.next_id();
            }
            lock(&self.employers).insert(user_id, saved.clone());
            Ok(saved)
        }

        async fn upgrade_subscription(&self, req: &UpgradeRequest) -> Result<Subscription, ApiError> {
            let mut found = false;
            if let Some(p) = lock(&self.job_seekers).get_mut(&req.user_id) {
                p.subscription_type = req.plan;
                found = true;
            }
            if let Some(p) = lock(&self.employers).get_mut(&req.user_id) {
                p.subscription_type = req.plan;
                found = true;
            }
            if !found {
                return Err(status(404, "no profile for user"));
            }
            Ok(Subscription {
                id: self.next_id(),
                user_id: req.user_id,
                plan: req.plan,
                active: true,
                start_date: None,
                end_date: None,
            })
        }
    }
}
