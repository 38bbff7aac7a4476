//! Client-side core of the job portal.
//! - `session` keeps the authoritative session and mirrors it to a durable store.
//! - `http` and `api` talk to the REST backend with the session's bearer token.
//! - `auth` sequences backend calls with session mutations.

pub mod errors;
pub mod storage;
pub mod file;
pub mod session;
pub mod http;
pub mod api;
pub mod auth;
pub mod pagination;
pub mod runtime;
