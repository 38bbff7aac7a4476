//! The reconciled, in-memory record of who is logged in.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::{Identity, Role};
use crate::profile::{EmployerProfile, JobSeekerProfile, RoleProfile, SubscriptionType};

/// Authoritative session read by the rest of the client.
///
/// Invariants (see [`Invariant`]):
/// - at most one of the two profiles is present
/// - a token is only present together with an identity
/// - a present profile matches the identity's role (and user, when known)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub identity: Option<Identity>,
    pub auth_token: Option<String>,
    pub job_seeker_profile: Option<JobSeekerProfile>,
    pub employer_profile: Option<EmployerProfile>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionField {
    Identity,
    AuthToken,
    JobSeekerProfile,
    EmployerProfile,
}

impl fmt::Display for SessionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionField::Identity => "identity",
            SessionField::AuthToken => "auth_token",
            SessionField::JobSeekerProfile => "job_seeker_profile",
            SessionField::EmployerProfile => "employer_profile",
        };
        f.write_str(s)
    }
}

/// A broken session invariant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invariant {
    /// Both role profiles present at once.
    ExclusiveProfiles,
    /// Token present without an identity.
    TokenWithoutIdentity,
    /// Profile present that the identity's role (or user id) does not own.
    ProfileOwnership(SessionField),
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invariant::ExclusiveProfiles => f.write_str("job seeker and employer profiles both present"),
            Invariant::TokenWithoutIdentity => f.write_str("auth token present without identity"),
            Invariant::ProfileOwnership(field) => write!(f, "{field} does not belong to the current identity"),
        }
    }
}

/// Whether `profile` may sit next to `identity` in one session.
pub fn profile_belongs_to<P: RoleProfile>(identity: Option<&Identity>, profile: &P) -> bool {
    match identity {
        None => false,
        Some(id) => {
            id.role == P::ROLE && profile.owner_user_id().map_or(true, |owner| owner == id.user_id)
        }
    }
}

impl Session {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|i| i.role)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.identity.as_ref().map(|i| i.user_id)
    }

    /// Subscription of whichever role profile is loaded.
    pub fn subscription_type(&self) -> Option<SubscriptionType> {
        self.job_seeker_profile
            .as_ref()
            .map(RoleProfile::subscription_type)
            .or_else(|| self.employer_profile.as_ref().map(RoleProfile::subscription_type))
    }

    pub fn is_premium(&self) -> bool {
        self.subscription_type() == Some(SubscriptionType::Premium)
    }

    /// List every invariant this value breaks.
    pub fn violations(&self) -> Vec<Invariant> {
        let mut out = Vec::new();
        if self.job_seeker_profile.is_some() && self.employer_profile.is_some() {
            out.push(Invariant::ExclusiveProfiles);
        }
        if self.auth_token.is_some() && self.identity.is_none() {
            out.push(Invariant::TokenWithoutIdentity);
        }
        let identity = self.identity.as_ref();
        if let Some(p) = &self.job_seeker_profile {
            if !profile_belongs_to(identity, p) {
                out.push(Invariant::ProfileOwnership(SessionField::JobSeekerProfile));
            }
        }
        if let Some(p) = &self.employer_profile {
            if !profile_belongs_to(identity, p) {
                out.push(Invariant::ProfileOwnership(SessionField::EmployerProfile));
            }
        }
        out
    }

    /// Drop every field that breaks an invariant and report which were dropped.
    ///
    /// The identity is never dropped: token and profiles are judged against it.
    pub fn enforce_invariants(&mut self) -> Vec<SessionField> {
        let mut dropped = Vec::new();
        if self.identity.is_none() && self.auth_token.take().is_some() {
            dropped.push(SessionField::AuthToken);
        }
        let identity = self.identity.as_ref();
        if self.job_seeker_profile.as_ref().is_some_and(|p| !profile_belongs_to(identity, p)) {
            self.job_seeker_profile = None;
            dropped.push(SessionField::JobSeekerProfile);
        }
        if self.employer_profile.as_ref().is_some_and(|p| !profile_belongs_to(identity, p)) {
            self.employer_profile = None;
            dropped.push(SessionField::EmployerProfile);
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employer() -> Identity {
        Identity::new(7, Role::Employer)
    }

    #[test]
    fn empty_session_has_no_violations() {
        assert!(Session::empty().violations().is_empty());
        assert!(Session::empty().is_empty());
    }

    #[test]
    fn token_without_identity_is_dropped() {
        let mut s = Session { auth_token: Some("t".into()), ..Default::default() };
        assert_eq!(s.violations(), vec![Invariant::TokenWithoutIdentity]);
        assert_eq!(s.enforce_invariants(), vec![SessionField::AuthToken]);
        assert!(s.is_empty());
    }

    #[test]
    fn mismatched_profile_is_dropped() {
        let mut s = Session {
            identity: Some(employer()),
            job_seeker_profile: Some(JobSeekerProfile::new(3)),
            employer_profile: Some(EmployerProfile::new(42)),
            ..Default::default()
        };
        let v = s.violations();
        assert!(v.contains(&Invariant::ExclusiveProfiles));
        assert!(v.contains(&Invariant::ProfileOwnership(SessionField::JobSeekerProfile)));
        assert_eq!(s.enforce_invariants(), vec![SessionField::JobSeekerProfile]);
        assert!(s.violations().is_empty());
        assert_eq!(s.employer_profile.as_ref().map(|p| p.employer_id), Some(42));
    }

    #[test]
    fn profile_of_other_user_is_dropped() {
        let mut p = EmployerProfile::new(42);
        p.user_id = Some(8);
        let mut s = Session { identity: Some(employer()), employer_profile: Some(p), ..Default::default() };
        assert_eq!(s.enforce_invariants(), vec![SessionField::EmployerProfile]);
    }

    #[test]
    fn premium_reads_from_loaded_profile() {
        let mut p = JobSeekerProfile::new(1);
        p.subscription_type = SubscriptionType::Premium;
        let s = Session {
            identity: Some(Identity::new(1, Role::JobSeeker)),
            job_seeker_profile: Some(p),
            ..Default::default()
        };
        assert!(s.is_premium());
        assert!(!Session::empty().is_premium());
    }
}
