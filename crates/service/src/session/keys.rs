use models::SessionField;

/// Durable key names of the session mirror.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageKeys {
    /// Canonical identity record (identity including role).
    pub user: String,
    /// Identity record written by older clients; read once and migrated.
    pub legacy_user: String,
    pub token: String,
    pub job_seeker_profile: String,
    pub employer_profile: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        let p = prefix.trim_end_matches('.');
        Self {
            user: format!("{p}.user"),
            legacy_user: format!("{p}.legacyUser"),
            token: format!("{p}.token"),
            job_seeker_profile: format!("{p}.jobSeekerProfile"),
            employer_profile: format!("{p}.employerProfile"),
        }
    }

    pub fn from_config(cfg: &configs::StorageConfig) -> Self {
        Self::with_prefix(&cfg.key_prefix)
    }

    /// Key mirroring a session field.
    pub fn for_field(&self, field: SessionField) -> &str {
        match field {
            SessionField::Identity => &self.user,
            SessionField::AuthToken => &self.token,
            SessionField::JobSeekerProfile => &self.job_seeker_profile,
            SessionField::EmployerProfile => &self.employer_profile,
        }
    }

    pub fn all(&self) -> [&str; 5] {
        [&self.user, &self.legacy_user, &self.token, &self.job_seeker_profile, &self.employer_profile]
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix("jobportal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_names() {
        let k = StorageKeys::with_prefix("portal.");
        assert_eq!(k.user, "portal.user");
        assert_eq!(k.for_field(SessionField::AuthToken), "portal.token");
        assert_eq!(k.all().len(), 5);
        assert_eq!(StorageKeys::default().employer_profile, "jobportal.employerProfile");
    }
}
