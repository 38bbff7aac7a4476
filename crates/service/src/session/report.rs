use std::fmt;

use models::{Invariant, SessionField};
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersistOp {
    Write,
    Remove,
    Encode,
}

impl fmt::Display for PersistOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PersistOp::Write => "write",
            PersistOp::Remove => "remove",
            PersistOp::Encode => "encode",
        })
    }
}

/// A durable-store operation that failed. The in-memory session is unaffected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistWarning {
    pub key: String,
    pub op: PersistOp,
    pub message: String,
}

impl PersistWarning {
    pub(crate) fn logged(key: &str, op: PersistOp, message: impl fmt::Display) -> Self {
        let message = message.to_string();
        warn!(%key, %op, error = %message, "session mirror write failed; in-memory session kept");
        Self { key: key.to_string(), op, message }
    }
}

/// Soft outcome of a write-through: empty when the mirror is in sync.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub warnings: Vec<PersistWarning>,
}

impl PersistReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub(crate) fn push(&mut self, w: PersistWarning) {
        self.warnings.push(w);
    }

    pub fn merge(&mut self, other: PersistReport) {
        self.warnings.extend(other.warnings);
    }
}

/// Something boot recovered from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootWarning {
    /// The store failed to return a key; treated as absent.
    Unreadable { key: String, message: String },
    /// A stored record did not parse; treated as absent.
    Malformed { key: String, message: String },
    /// A parsed field contradicted the resolved identity and was dropped.
    Dropped { field: SessionField, reason: Invariant },
    /// Pruning or migrating the mirror failed.
    Persist(PersistWarning),
}

impl BootWarning {
    pub(crate) fn unreadable(key: &str, message: impl fmt::Display) -> Self {
        let message = message.to_string();
        warn!(%key, error = %message, "session key unreadable; treating as absent");
        Self::Unreadable { key: key.to_string(), message }
    }

    pub(crate) fn malformed(key: &str, message: impl fmt::Display) -> Self {
        let message = message.to_string();
        warn!(%key, error = %message, "session record malformed; treating as absent");
        Self::Malformed { key: key.to_string(), message }
    }

    pub(crate) fn dropped(field: SessionField, reason: Invariant) -> Self {
        warn!(%field, %reason, "session field dropped at boot");
        Self::Dropped { field, reason }
    }
}
