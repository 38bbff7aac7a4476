//! Boot-time reconciliation of the durable mirror into one session.
//!
//! Resolution rules:
//! - the canonical identity record wins over the legacy one; the legacy record
//!   is only used when the canonical one is absent or malformed, and is then
//!   migrated to the canonical key
//! - unreadable keys and malformed records are treated as absent
//! - when the canonical key could not be read, a legacy identity is used for
//!   this boot only; nothing is migrated and no key is pruned for contradicting it
//! - token and profiles that contradict the resolved identity are dropped
//! - every key that fed nothing into the session is pruned from the mirror

use models::{EmployerProfile, Identity, Invariant, JobSeekerProfile, Session, SessionField};
use tracing::{debug, info};

use super::keys::StorageKeys;
use super::records;
use super::report::{BootWarning, PersistOp, PersistWarning};
use crate::storage::DurableStore;

/// Outcome of [`reconcile`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BootReport {
    pub session: Session,
    pub warnings: Vec<BootWarning>,
    /// The identity came from the legacy record and was rewritten under the canonical key.
    pub migrated_legacy: bool,
}

impl BootReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

async fn read(store: &dyn DurableStore, key: &str, warnings: &mut Vec<BootWarning>) -> Option<String> {
    match store.get(key).await {
        Ok(v) => v,
        Err(e) => {
            warnings.push(BootWarning::unreadable(key, e));
            None
        }
    }
}

fn parse<T>(
    raw: Option<&str>,
    key: &str,
    decode: impl Fn(&str) -> Result<T, serde_json::Error>,
    warnings: &mut Vec<BootWarning>,
    prune: &mut Vec<String>,
) -> Option<T> {
    let raw = raw?;
    match decode(raw) {
        Ok(v) => Some(v),
        Err(e) => {
            warnings.push(BootWarning::malformed(key, e));
            prune.push(key.to_string());
            None
        }
    }
}

fn drop_reason(field: SessionField) -> Invariant {
    match field {
        SessionField::AuthToken => Invariant::TokenWithoutIdentity,
        other => Invariant::ProfileOwnership(other),
    }
}

/// Read the five session keys and resolve them into one consistent session.
///
/// Never fails: every problem is logged and recorded in the report.
pub async fn reconcile(store: &dyn DurableStore, keys: &StorageKeys) -> BootReport {
    let mut warnings = Vec::new();
    let mut prune: Vec<String> = Vec::new();

    let (raw_user, canonical_unreadable) = match store.get(&keys.user).await {
        Ok(v) => (v, false),
        Err(e) => {
            warnings.push(BootWarning::unreadable(&keys.user, e));
            (None, true)
        }
    };
    let raw_legacy = read(store, &keys.legacy_user, &mut warnings).await;
    let raw_token = read(store, &keys.token, &mut warnings).await;
    let raw_job_seeker = read(store, &keys.job_seeker_profile, &mut warnings).await;
    let raw_employer = read(store, &keys.employer_profile, &mut warnings).await;

    let mut migrated_legacy = false;
    let identity = match parse(raw_user.as_deref(), &keys.user, records::decode::<Identity>, &mut warnings, &mut prune) {
        Some(identity) => {
            if raw_legacy.is_some() {
                debug!(key = %keys.legacy_user, "canonical identity present; pruning legacy record");
                prune.push(keys.legacy_user.clone());
            }
            Some(identity)
        }
        None => {
            let legacy = parse(
                raw_legacy.as_deref(),
                &keys.legacy_user,
                records::decode_legacy_identity,
                &mut warnings,
                &mut prune,
            );
            if legacy.is_some() && canonical_unreadable {
                debug!(key = %keys.user, "canonical identity unreadable; using legacy record for this boot only");
            }
            migrated_legacy = legacy.is_some() && !canonical_unreadable;
            legacy
        }
    };

    let auth_token = raw_token.as_deref().and_then(|raw| {
        let token = records::decode_token(raw);
        if token.is_none() {
            warnings.push(BootWarning::malformed(&keys.token, "blank token"));
            prune.push(keys.token.clone());
        }
        token
    });

    let mut session = Session {
        identity,
        auth_token,
        job_seeker_profile: parse(
            raw_job_seeker.as_deref(),
            &keys.job_seeker_profile,
            records::decode::<JobSeekerProfile>,
            &mut warnings,
            &mut prune,
        ),
        employer_profile: parse(raw_employer.as_deref(), &keys.employer_profile, records::decode::<EmployerProfile>, &mut warnings, &mut prune),
    };

    for field in session.enforce_invariants() {
        warnings.push(BootWarning::dropped(field, drop_reason(field)));
        // the stored canonical identity may still own these
        if !canonical_unreadable {
            prune.push(keys.for_field(field).to_string());
        }
    }

    prune.sort();
    prune.dedup();
    for key in &prune {
        if let Err(e) = store.remove(key).await {
            warnings.push(BootWarning::Persist(PersistWarning::logged(key, PersistOp::Remove, e)));
        }
    }

    if migrated_legacy {
        if let Some(identity) = &session.identity {
            migrate_legacy(store, keys, identity, &mut warnings).await;
        }
    }

    info!(
        authenticated = session.is_authenticated(),
        role = ?session.role(),
        has_token = session.auth_token.is_some(),
        job_seeker_profile = session.job_seeker_profile.is_some(),
        employer_profile = session.employer_profile.is_some(),
        migrated_legacy,
        warnings = warnings.len(),
        "session_boot"
    );

    BootReport { session, warnings, migrated_legacy }
}

async fn migrate_legacy(store: &dyn DurableStore, keys: &StorageKeys, identity: &Identity, warnings: &mut Vec<BootWarning>) {
    let encoded = match records::encode(identity) {
        Ok(s) => s,
        Err(e) => {
            warnings.push(BootWarning::Persist(PersistWarning::logged(&keys.user, PersistOp::Encode, e)));
            return;
        }
    };
    if let Err(e) = store.set(&keys.user, encoded).await {
        // keep the legacy record so the next boot can retry
        warnings.push(BootWarning::Persist(PersistWarning::logged(&keys.user, PersistOp::Write, e)));
        return;
    }
    if let Err(e) = store.remove(&keys.legacy_user).await {
        warnings.push(BootWarning::Persist(PersistWarning::logged(&keys.legacy_user, PersistOp::Remove, e)));
        return;
    }
    info!(user_id = identity.user_id, "legacy identity record migrated");
}
