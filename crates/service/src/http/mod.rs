//! Thin HTTP client for the portal backend.
//!
//! `ApiClient` joins paths onto the configured base URL, attaches the bearer
//! token of the current session and picks the content type. It does not
//! retry and does not interpret status codes; see [`crate::api`] for that.

pub mod client;
pub mod errors;

pub use client::{ApiClient, RequestBody, RequestOptions, StaticToken, TokenSource};
pub use errors::ApiError;
