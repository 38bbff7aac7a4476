use std::sync::Arc;

use models::subscription::{Subscription, UpgradeRequest};
use models::{EmployerProfile, Identity, JobSeekerProfile, RegisterInput, Role, SubscriptionType};
use tracing::{debug, info, instrument, warn};

use super::domain::{LoginInput, LoginOutcome, ProfileLoad};
use super::errors::AuthError;
use super::repository::AuthBackend;
use crate::session::{Epoch, PersistReport, SessionError, SessionSynchronizer};

/// Auth flows on top of the session synchronizer.
pub struct AuthService<B: AuthBackend> {
    backend: Arc<B>,
    session: Arc<SessionSynchronizer>,
}

impl<B: AuthBackend> AuthService<B> {
    pub fn new(backend: Arc<B>, session: Arc<SessionSynchronizer>) -> Self {
        Self { backend, session }
    }

    pub fn session(&self) -> &Arc<SessionSynchronizer> {
        &self.session
    }

    /// Authenticate, start a session and load the role profile.
    ///
    /// A failed profile fetch does not fail the login; it is reported in
    /// [`LoginOutcome::profile`].
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use models::{EmployerProfile, Identity, Role};
    /// use service::auth::{domain::{LoginInput, ProfileLoad}, repository::mock::MockAuthBackend, AuthService};
    /// use service::session::{SessionSynchronizer, StorageKeys};
    /// use service::storage::MemoryKvStore;
    ///
    /// let backend = Arc::new(
    ///     MockAuthBackend::new()
    ///         .with_account("Passw0rd!", Identity::new(7, Role::Employer).with_email("hr@acme.io"))
    ///         .with_employer_profile(7, EmployerProfile::new(42)),
    /// );
    /// let (sync, _) = tokio_test::block_on(SessionSynchronizer::boot(Arc::new(MemoryKvStore::new()), StorageKeys::default()));
    /// let svc = AuthService::new(backend, Arc::new(sync));
    /// let input = LoginInput { email: "hr@acme.io".into(), password: "Passw0rd!".into() };
    /// let outcome = tokio_test::block_on(svc.login(input)).unwrap();
    /// assert_eq!(outcome.profile, ProfileLoad::Loaded);
    /// assert_eq!(svc.session().session().employer_profile.map(|p| p.employer_id), Some(42));
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<LoginOutcome, AuthError> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("email and password required".into()));
        }
        let resp = self.backend.login(&input.into()).await?;
        let identity = resp.user.clone();
        let (epoch, mut persist) = self.session.login_with_epoch(resp.user, resp.token).await;

        let profile = match self.load_profile(epoch, &identity, &mut persist).await {
            Ok(load) => load,
            Err(e) => {
                warn!(user_id = identity.user_id, error = %e, "profile fetch failed after login");
                ProfileLoad::Failed(e.to_string())
            }
        };
        info!(user_id = identity.user_id, role = %identity.role, ?profile, "user_logged_in");
        Ok(LoginOutcome { identity, profile, persist })
    }

    /// Create an account. Does not log in.
    #[instrument(skip(self, input), fields(email = %input.email, role = %input.role))]
    pub async fn register(&self, input: RegisterInput) -> Result<Identity, AuthError> {
        input.validate().map_err(|e| AuthError::Validation(e.to_string()))?;
        let user = self.backend.register(&input).await?;
        info!(user_id = user.user_id, role = %user.role, "user_registered");
        Ok(user)
    }

    pub async fn logout(&self) -> PersistReport {
        self.session.logout().await
    }

    /// Re-fetch the role profile of the current identity under the current epoch.
    #[instrument(skip(self))]
    pub async fn refresh_profile(&self) -> Result<(ProfileLoad, PersistReport), AuthError> {
        let epoch = self.session.epoch();
        let identity = self.session.session().identity.ok_or(AuthError::NotLoggedIn)?;
        let mut persist = PersistReport::default();
        let load = self.load_profile(epoch, &identity, &mut persist).await?;
        Ok((load, persist))
    }

    /// Upgrade the current user's plan, then refresh the profile so the session
    /// reflects the new subscription.
    #[instrument(skip(self))]
    pub async fn upgrade_subscription(
        &self,
        plan: SubscriptionType,
        payment_id: Option<i64>,
    ) -> Result<(Subscription, ProfileLoad), AuthError> {
        let user_id = self.session.session().user_id().ok_or(AuthError::NotLoggedIn)?;
        let subscription = self.backend.upgrade_subscription(&UpgradeRequest { user_id, plan, payment_id }).await?;
        info!(user_id, plan = ?subscription.plan, "subscription_upgraded");
        let (load, _) = self.refresh_profile().await?;
        Ok((subscription, load))
    }

    /// Create or update the job seeker profile of the current user and put the
    /// saved version into the session.
    pub async fn save_job_seeker_profile(&self, mut profile: JobSeekerProfile) -> Result<JobSeekerProfile, AuthError> {
        let (epoch, identity) = self.current(Role::JobSeeker)?;
        profile.user_id = Some(identity.user_id);
        let saved = self.backend.save_job_seeker_profile(&profile).await?;
        self.session.apply_job_seeker_profile(epoch, Some(saved.clone())).await?;
        Ok(saved)
    }

    /// Create or update the employer profile of the current user and put the
    /// saved version into the session.
    pub async fn save_employer_profile(&self, mut profile: EmployerProfile) -> Result<EmployerProfile, AuthError> {
        let (epoch, identity) = self.current(Role::Employer)?;
        profile.user_id = Some(identity.user_id);
        let saved = self.backend.save_employer_profile(&profile).await?;
        self.session.apply_employer_profile(epoch, Some(saved.clone())).await?;
        Ok(saved)
    }

    fn current(&self, role: Role) -> Result<(Epoch, Identity), AuthError> {
        let epoch = self.session.epoch();
        let identity = self.session.session().identity.ok_or(AuthError::NotLoggedIn)?;
        if identity.role != role {
            return Err(AuthError::Validation(format!("requires role {role}, logged in as {}", identity.role)));
        }
        Ok((epoch, identity))
    }

    async fn load_profile(&self, epoch: Epoch, identity: &Identity, persist: &mut PersistReport) -> Result<ProfileLoad, AuthError> {
        let applied = match identity.role {
            Role::Admin => return Ok(ProfileLoad::NotApplicable),
            Role::JobSeeker => {
                let profile = self.backend.job_seeker_profile(identity.user_id).await?;
                let missing = profile.is_none();
                (self.session.apply_job_seeker_profile(epoch, profile).await, missing)
            }
            Role::Employer => {
                let profile = self.backend.employer_profile(identity.user_id).await?;
                let missing = profile.is_none();
                (self.session.apply_employer_profile(epoch, profile).await, missing)
            }
        };
        match applied {
            (Ok(report), missing) => {
                persist.merge(report);
                Ok(if missing { ProfileLoad::Missing } else { ProfileLoad::Loaded })
            }
            (Err(SessionError::StaleEpoch { ticket, current }), _) => {
                debug!(%ticket, %current, user_id = identity.user_id, "profile fetched for an older session; discarded");
                Ok(ProfileLoad::Discarded)
            }
            (Err(e), _) => Err(e.into()),
        }
    }
}
