//! Auth flows: backend calls sequenced with session mutations.
//!
//! Three layers as elsewhere in the crate: `domain` types, the `repository`
//! seam to the backend (implemented by [`crate::api::PortalApi`]) and the
//! `service` that binds fetched profiles to the session epoch.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;

pub use errors::AuthError;
pub use service::AuthService;
