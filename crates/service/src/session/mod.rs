//! Session state synchronizer.
//!
//! One authoritative [`models::Session`] lives in memory and is published on a
//! `watch` channel; every mutation is mirrored to a [`DurableStore`] so the
//! next process can rebuild it with [`SessionSynchronizer::boot`].
//!
//! [`DurableStore`]: crate::storage::DurableStore

pub mod errors;
pub mod keys;
pub mod records;
pub mod reconcile;
pub mod report;
pub mod synchronizer;

pub use errors::SessionError;
pub use keys::StorageKeys;
pub use reconcile::BootReport;
pub use report::{BootWarning, PersistOp, PersistReport, PersistWarning};
pub use synchronizer::{Epoch, SessionSynchronizer};
