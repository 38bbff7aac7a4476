use std::fmt;
use std::sync::Arc;

use models::session::profile_belongs_to;
use models::{EmployerProfile, Identity, JobSeekerProfile, RoleProfile, Session, SessionField};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument};

use super::errors::SessionError;
use super::keys::StorageKeys;
use super::reconcile::{reconcile, BootReport};
use super::records;
use super::report::{PersistOp, PersistReport, PersistWarning};
use crate::storage::DurableStore;

/// Monotonic session generation. Advanced by every login and every logout
/// that cleared something; async results captured under an older epoch are
/// discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Epoch(self.0 + 1)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct SyncState {
    session: Session,
    epoch: Epoch,
}

/// Which session slot a role profile lives in.
trait ProfileSlot: RoleProfile + Serialize + Clone + Send + Sync {
    const FIELD: SessionField;
    const OPPOSITE: SessionField;

    fn slot(session: &mut Session) -> &mut Option<Self>;

    /// Clear the other role's profile; returns whether one was present.
    fn clear_opposite(session: &mut Session) -> bool;
}

impl ProfileSlot for JobSeekerProfile {
    const FIELD: SessionField = SessionField::JobSeekerProfile;
    const OPPOSITE: SessionField = SessionField::EmployerProfile;

    fn slot(session: &mut Session) -> &mut Option<Self> {
        &mut session.job_seeker_profile
    }

    fn clear_opposite(session: &mut Session) -> bool {
        session.employer_profile.take().is_some()
    }
}

impl ProfileSlot for EmployerProfile {
    const FIELD: SessionField = SessionField::EmployerProfile;
    const OPPOSITE: SessionField = SessionField::JobSeekerProfile;

    fn slot(session: &mut Session) -> &mut Option<Self> {
        &mut session.employer_profile
    }

    fn clear_opposite(session: &mut Session) -> bool {
        session.job_seeker_profile.take().is_some()
    }
}

/// Owner of the authoritative [`Session`].
///
/// Mutations run under one async lock that also covers their write-through,
/// so the durable mirror observes them in session order. Readers get cheap
/// snapshots from the `watch` channel.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use models::{Identity, Role};
/// use service::session::{SessionSynchronizer, StorageKeys};
/// use service::storage::MemoryKvStore;
///
/// let store = Arc::new(MemoryKvStore::new());
/// let (sync, _) = tokio_test::block_on(SessionSynchronizer::boot(store.clone(), StorageKeys::default()));
/// let report = tokio_test::block_on(sync.login(Identity::new(7, Role::Employer), Some("tok123".into())));
/// assert!(report.is_clean());
/// assert_eq!(sync.session().role(), Some(Role::Employer));
/// assert_eq!(store.raw("jobportal.token").as_deref(), Some(r#""tok123""#));
/// ```
pub struct SessionSynchronizer {
    store: Arc<dyn DurableStore>,
    keys: StorageKeys,
    state: Mutex<SyncState>,
    published: watch::Sender<Session>,
    current_epoch: watch::Sender<Epoch>,
}

impl SessionSynchronizer {
    /// Rebuild the session from the durable mirror and publish it.
    ///
    /// Always succeeds; what was recovered from is listed in the report.
    #[instrument(skip_all)]
    pub async fn boot(store: Arc<dyn DurableStore>, keys: StorageKeys) -> (Self, BootReport) {
        let report = reconcile(store.as_ref(), &keys).await;
        let (published, _) = watch::channel(report.session.clone());
        let (current_epoch, _) = watch::channel(Epoch::default());
        let sync = Self {
            store,
            keys,
            state: Mutex::new(SyncState { session: report.session.clone(), epoch: Epoch::default() }),
            published,
            current_epoch,
        };
        (sync, report)
    }

    /// Current session snapshot.
    pub fn session(&self) -> Session {
        self.published.borrow().clone()
    }

    /// Receiver that observes every published session.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.published.subscribe()
    }

    pub fn epoch(&self) -> Epoch {
        *self.current_epoch.borrow()
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Bearer token of the current session, if any.
    pub fn bearer_token(&self) -> Option<String> {
        self.published.borrow().auth_token.clone()
    }

    fn publish(&self, state: &SyncState) {
        self.published.send_replace(state.session.clone());
        self.current_epoch.send_replace(state.epoch);
    }

    async fn put<T: Serialize>(&self, key: &str, value: &T, report: &mut PersistReport) {
        let encoded = match records::encode(value) {
            Ok(s) => s,
            Err(e) => {
                report.push(PersistWarning::logged(key, PersistOp::Encode, e));
                return;
            }
        };
        self.put_raw(key, encoded, report).await;
    }

    async fn put_raw(&self, key: &str, value: String, report: &mut PersistReport) {
        if let Err(e) = self.store.set(key, value).await {
            report.push(PersistWarning::logged(key, PersistOp::Write, e));
        }
    }

    async fn delete(&self, key: &str, report: &mut PersistReport) {
        if let Err(e) = self.store.remove(key).await {
            report.push(PersistWarning::logged(key, PersistOp::Remove, e));
        }
    }

    /// Log a user in and advance the epoch.
    ///
    /// A profile that does not belong to the new identity (other role or other
    /// user) is cleared. Profiles are not fetched here.
    pub async fn login(&self, identity: Identity, token: Option<String>) -> PersistReport {
        self.login_with_epoch(identity, token).await.1
    }

    /// [`login`](Self::login), also returning the epoch the login started.
    ///
    /// Results fetched on behalf of this login are applied with that epoch.
    #[instrument(skip(self, identity, token), fields(user_id = identity.user_id, role = %identity.role))]
    pub async fn login_with_epoch(&self, identity: Identity, token: Option<String>) -> (Epoch, PersistReport) {
        let mut state = self.state.lock().await;
        let token = token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

        state.session.identity = Some(identity);
        state.session.auth_token = token;
        let dropped = state.session.enforce_invariants();
        state.epoch = state.epoch.next();
        self.publish(&state);

        let mut report = PersistReport::default();
        if let Some(identity) = &state.session.identity {
            self.put(&self.keys.user, identity, &mut report).await;
        }
        match &state.session.auth_token {
            Some(t) => match records::encode_token(t) {
                Ok(encoded) => self.put_raw(&self.keys.token, encoded, &mut report).await,
                Err(e) => report.push(PersistWarning::logged(&self.keys.token, PersistOp::Encode, e)),
            },
            None => self.delete(&self.keys.token, &mut report).await,
        }
        for field in &dropped {
            debug!(%field, "profile cleared by login");
            self.delete(self.keys.for_field(*field), &mut report).await;
        }
        info!(epoch = %state.epoch, mirrored = report.is_clean(), "session_login");
        (state.epoch, report)
    }

    /// Clear the whole session and every mirrored key. Idempotent.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> PersistReport {
        let mut state = self.state.lock().await;
        if !state.session.is_empty() {
            state.session = Session::default();
            state.epoch = state.epoch.next();
            self.publish(&state);
            info!(epoch = %state.epoch, "session_logout");
        }

        let mut report = PersistReport::default();
        for key in self.keys.all() {
            self.delete(key, &mut report).await;
        }
        report
    }

    /// Set or clear the job seeker profile of the current session.
    pub async fn set_job_seeker_profile(&self, profile: Option<JobSeekerProfile>) -> Result<PersistReport, SessionError> {
        self.apply_profile(None, profile).await
    }

    /// Set or clear the employer profile of the current session.
    pub async fn set_employer_profile(&self, profile: Option<EmployerProfile>) -> Result<PersistReport, SessionError> {
        self.apply_profile(None, profile).await
    }

    /// Like [`set_job_seeker_profile`](Self::set_job_seeker_profile), but only while `epoch` is current.
    pub async fn apply_job_seeker_profile(
        &self,
        epoch: Epoch,
        profile: Option<JobSeekerProfile>,
    ) -> Result<PersistReport, SessionError> {
        self.apply_profile(Some(epoch), profile).await
    }

    /// Like [`set_employer_profile`](Self::set_employer_profile), but only while `epoch` is current.
    pub async fn apply_employer_profile(
        &self,
        epoch: Epoch,
        profile: Option<EmployerProfile>,
    ) -> Result<PersistReport, SessionError> {
        self.apply_profile(Some(epoch), profile).await
    }

    async fn apply_profile<P: ProfileSlot>(&self, ticket: Option<Epoch>, profile: Option<P>) -> Result<PersistReport, SessionError> {
        let mut state = self.state.lock().await;
        if let Some(ticket) = ticket {
            if ticket != state.epoch {
                debug!(field = %P::FIELD, %ticket, current = %state.epoch, "stale profile update discarded");
                return Err(SessionError::StaleEpoch { ticket, current: state.epoch });
            }
        }

        let mut report = PersistReport::default();
        let key = self.keys.for_field(P::FIELD);
        let Some(profile) = profile else {
            if P::slot(&mut state.session).take().is_some() {
                self.publish(&state);
            }
            self.delete(key, &mut report).await;
            return Ok(report);
        };

        check_owner(state.session.identity.as_ref(), &profile, P::FIELD)?;
        *P::slot(&mut state.session) = Some(profile.clone());
        let cleared_opposite = P::clear_opposite(&mut state.session);
        self.publish(&state);

        self.put(key, &profile, &mut report).await;
        if cleared_opposite {
            self.delete(self.keys.for_field(P::OPPOSITE), &mut report).await;
        }
        debug!(field = %P::FIELD, subscription = ?profile.subscription_type(), "profile set");
        Ok(report)
    }
}

fn check_owner<P: RoleProfile>(identity: Option<&Identity>, profile: &P, field: SessionField) -> Result<(), SessionError> {
    let identity = identity.ok_or(SessionError::NotLoggedIn)?;
    if profile_belongs_to(Some(identity), profile) {
        return Ok(());
    }
    if identity.role != P::ROLE {
        return Err(SessionError::RoleMismatch { field, required: P::ROLE, actual: identity.role });
    }
    Err(SessionError::ForeignProfile {
        field,
        owner: profile.owner_user_id().unwrap_or_default(),
        current: identity.user_id,
    })
}

impl fmt::Debug for SessionSynchronizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSynchronizer")
            .field("keys", &self.keys)
            .field("epoch", &self.epoch())
            .field("session", &*self.published.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;
    use models::{ApprovalStatus, Role, SubscriptionType};

    async fn boot(store: &Arc<MemoryKvStore>) -> SessionSynchronizer {
        let (sync, _) = SessionSynchronizer::boot(store.clone(), StorageKeys::default()).await;
        sync
    }

    fn employer_profile() -> EmployerProfile {
        EmployerProfile {
            employer_id: 42,
            subscription_type: SubscriptionType::Free,
            approval_status: ApprovalStatus::Pending,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn end_to_end_employer_session() {
        let store = Arc::new(MemoryKvStore::new());
        let keys = StorageKeys::default();
        let sync = boot(&store).await;

        let report = sync.login(Identity::new(7, Role::Employer), Some("tok123".into())).await;
        assert!(report.is_clean());
        assert!(store.raw(&keys.user).is_some());
        assert_eq!(store.raw(&keys.token).as_deref(), Some(r#""tok123""#));

        sync.set_employer_profile(Some(employer_profile())).await.unwrap();
        let session = sync.session();
        assert_eq!(session.role(), Some(Role::Employer));
        assert_eq!(session.employer_profile.as_ref().map(|p| p.approval_status), Some(ApprovalStatus::Pending));

        // simulated restart
        let restarted = boot(&store).await;
        assert_eq!(restarted.session(), session);

        restarted.logout().await;
        assert!(restarted.session().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let store = Arc::new(MemoryKvStore::new());
        let sync = boot(&store).await;
        sync.login(Identity::new(1, Role::JobSeeker), None).await;

        assert!(sync.logout().await.is_clean());
        let epoch = sync.epoch();
        let once = (sync.session(), store.snapshot());
        assert!(sync.logout().await.is_clean());
        assert_eq!((sync.session(), store.snapshot()), once);
        assert_eq!(sync.epoch(), epoch);
        assert!(once.0.is_empty() && once.1.is_empty());
    }

    #[tokio::test]
    async fn profile_for_wrong_role_is_rejected() {
        let store = Arc::new(MemoryKvStore::new());
        let sync = boot(&store).await;
        assert_eq!(sync.set_employer_profile(Some(employer_profile())).await, Err(SessionError::NotLoggedIn));

        sync.login(Identity::new(3, Role::JobSeeker), Some("t".into())).await;
        let err = sync.set_employer_profile(Some(employer_profile())).await.unwrap_err();
        assert_eq!(
            err,
            SessionError::RoleMismatch { field: SessionField::EmployerProfile, required: Role::Employer, actual: Role::JobSeeker }
        );
        assert!(sync.session().employer_profile.is_none());
        assert!(store.raw(&StorageKeys::default().employer_profile).is_none());
    }

    #[tokio::test]
    async fn profile_of_other_user_is_rejected() {
        let store = Arc::new(MemoryKvStore::new());
        let sync = boot(&store).await;
        sync.login(Identity::new(7, Role::Employer), None).await;
        let mut p = employer_profile();
        p.user_id = Some(8);
        assert!(matches!(
            sync.set_employer_profile(Some(p)).await,
            Err(SessionError::ForeignProfile { owner: 8, current: 7, .. })
        ));
    }

    #[tokio::test]
    async fn profiles_never_coexist() {
        let store = Arc::new(MemoryKvStore::new());
        let sync = boot(&store).await;
        let mut rx = sync.subscribe();

        sync.login(Identity::new(1, Role::JobSeeker), None).await;
        sync.set_job_seeker_profile(Some(JobSeekerProfile::new(11))).await.unwrap();
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert!(seen.job_seeker_profile.is_some() && seen.employer_profile.is_none());

        // role switch through login drops the stale slice
        sync.login(Identity::new(1, Role::Employer), None).await;
        assert!(sync.session().job_seeker_profile.is_none());
        assert!(store.raw(&StorageKeys::default().job_seeker_profile).is_none());

        sync.set_employer_profile(Some(employer_profile())).await.unwrap();
        let s = sync.session();
        assert!(s.employer_profile.is_some() && s.job_seeker_profile.is_none());
        assert!(s.violations().is_empty());
    }

    #[tokio::test]
    async fn clearing_profile_removes_key() {
        let store = Arc::new(MemoryKvStore::new());
        let sync = boot(&store).await;
        sync.login(Identity::new(1, Role::JobSeeker), None).await;
        sync.set_job_seeker_profile(Some(JobSeekerProfile::new(11))).await.unwrap();
        sync.set_job_seeker_profile(None).await.unwrap();
        assert!(sync.session().job_seeker_profile.is_none());
        assert!(store.raw(&StorageKeys::default().job_seeker_profile).is_none());
        // clearing is allowed even when logged out
        sync.logout().await;
        assert!(sync.set_employer_profile(None).await.is_ok());
    }

    #[tokio::test]
    async fn stale_epoch_cannot_resurrect_profile() {
        let store = Arc::new(MemoryKvStore::new());
        let sync = boot(&store).await;
        sync.login(Identity::new(1, Role::JobSeeker), Some("t".into())).await;
        let ticket = sync.epoch();

        // user logs out while the profile fetch is in flight
        sync.logout().await;
        let late = sync.apply_job_seeker_profile(ticket, Some(JobSeekerProfile::new(11))).await;
        assert!(late.unwrap_err().is_stale());
        assert!(sync.session().is_empty());
        assert!(store.is_empty());

        // a new login also invalidates the old ticket
        sync.login(Identity::new(1, Role::JobSeeker), None).await;
        assert!(sync.apply_job_seeker_profile(ticket, Some(JobSeekerProfile::new(11))).await.is_err());
        let fresh = sync.epoch();
        assert!(fresh > ticket);
        assert!(sync.apply_job_seeker_profile(fresh, Some(JobSeekerProfile::new(11))).await.is_ok());
    }

    #[tokio::test]
    async fn failed_writes_are_soft() {
        let store = Arc::new(MemoryKvStore::new());
        let sync = boot(&store).await;
        store.set_fail_writes(true);

        let report = sync.login(Identity::new(7, Role::Employer), Some("tok".into())).await;
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings.iter().all(|w| w.op == PersistOp::Write));
        // memory stays authoritative
        assert_eq!(sync.bearer_token().as_deref(), Some("tok"));
        assert!(store.is_empty());

        let report = sync.set_employer_profile(Some(employer_profile())).await.unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert!(sync.session().employer_profile.is_some());
    }

    #[tokio::test]
    async fn login_without_token_removes_old_token() {
        let store = Arc::new(MemoryKvStore::new());
        let sync = boot(&store).await;
        sync.login(Identity::new(7, Role::Admin), Some("old".into())).await;
        sync.login(Identity::new(7, Role::Admin), Some("  ".into())).await;
        assert_eq!(sync.bearer_token(), None);
        assert!(store.raw(&StorageKeys::default().token).is_none());
    }

    #[tokio::test]
    async fn round_trip_through_mirror() {
        let store = Arc::new(MemoryKvStore::new());
        let sync = boot(&store).await;
        let identity = Identity::new(9, Role::JobSeeker).with_email("js@x.io").with_name("Jo");
        sync.login(identity, Some("abc".into())).await;
        let mut profile = JobSeekerProfile::new(90);
        profile.user_id = Some(9);
        profile.skills = vec!["rust".into(), "sql".into()];
        profile.subscription_type = SubscriptionType::Premium;
        sync.set_job_seeker_profile(Some(profile)).await.unwrap();

        let (restarted, report) = SessionSynchronizer::boot(store.clone(), StorageKeys::default()).await;
        assert!(report.is_clean());
        assert_eq!(restarted.session(), sync.session());
        assert!(restarted.session().is_premium());
    }

    #[tokio::test]
    async fn token_that_looks_like_json_survives_restart() {
        let store = Arc::new(MemoryKvStore::new());
        let sync = boot(&store).await;
        sync.login(Identity::new(1, Role::Admin), Some("\"abc\"".into())).await;
        assert_eq!(sync.bearer_token().as_deref(), Some("\"abc\""));

        let restarted = boot(&store).await;
        assert_eq!(restarted.bearer_token().as_deref(), Some("\"abc\""));
    }

    #[tokio::test]
    async fn raw_token_from_older_writer_is_accepted() {
        let store = Arc::new(MemoryKvStore::new());
        let keys = StorageKeys::default();
        store.seed(keys.user.clone(), records::encode(&Identity::new(1, Role::Admin)).unwrap());
        store.seed(keys.token.clone(), "eyJhbGciOiJIUzI1NiJ9.e30.sig");
        let sync = boot(&store).await;
        assert_eq!(sync.bearer_token().as_deref(), Some("eyJhbGciOiJIUzI1NiJ9.e30.sig"));
    }
}
