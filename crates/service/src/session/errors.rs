use models::{Role, SessionField};
use thiserror::Error;

use super::synchronizer::Epoch;

/// Rejected session mutations. The session is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no user is logged in")]
    NotLoggedIn,
    #[error("{field} requires role {required}, session role is {actual}")]
    RoleMismatch { field: SessionField, required: Role, actual: Role },
    #[error("{field} belongs to user {owner}, session user is {current}")]
    ForeignProfile { field: SessionField, owner: i64, current: i64 },
    #[error("stale session epoch {ticket} (current {current}); result discarded")]
    StaleEpoch { ticket: Epoch, current: Epoch },
}

impl SessionError {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleEpoch { .. })
    }
}
