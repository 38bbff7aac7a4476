//! Domain types shared by the job portal client.
//!
//! - `identity`, `profile` and `session` hold the logged-in state mirrored to
//!   the durable store.
//! - The remaining modules are request/response shapes of the REST backend.

pub mod errors;
pub mod identity;
pub mod profile;
pub mod session;
pub mod user;
pub mod job;
pub mod application;
pub mod saved_job;
pub mod subscription;
pub mod payment;
pub mod admin;

pub use identity::{Identity, Role, UserStatus};
pub use profile::{ApprovalStatus, EmployerProfile, JobSeekerProfile, RoleProfile, SubscriptionType};
pub use session::{Invariant, Session, SessionField};
pub use user::{LoginRequest, LoginResponse, RegisterInput};

#[cfg(test)]
mod tests;
