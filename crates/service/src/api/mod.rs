//! Typed facade over the portal REST backend.
//!
//! Each submodule adds `impl PortalApi` blocks for one resource. Non-2xx
//! responses become [`ApiError::Status`]; bodies are decoded with serde.

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::http::{ApiClient, ApiError, RequestOptions};

pub mod admin;
pub mod applications;
pub mod billing;
pub mod jobs;
pub mod profiles;
pub mod users;

#[derive(Clone, Debug)]
pub struct PortalApi {
    client: ApiClient,
}

impl PortalApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Send and decode a JSON body.
    async fn call<T: DeserializeOwned>(&self, path: &str, opts: RequestOptions) -> Result<T, ApiError> {
        let resp = ensure_success(self.client.send(path, opts).await?).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(format!("{path}: {e}")))
    }

    /// Like [`call`](Self::call), with `404` read as `None`.
    async fn call_optional<T: DeserializeOwned>(&self, path: &str, opts: RequestOptions) -> Result<Option<T>, ApiError> {
        match self.call(path, opts).await {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_not_found() => {
                debug!(%path, "not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Send and decode a list, accepting a bare array or a `{ "content": [..] }` page.
    async fn call_list<T: DeserializeOwned>(&self, path: &str, opts: RequestOptions) -> Result<Vec<T>, ApiError> {
        let listing: Listing<T> = self.call(path, opts).await?;
        Ok(match listing {
            Listing::Items(items) => items,
            Listing::Page { content } => content,
        })
    }

    /// Send and ignore the body.
    async fn call_empty(&self, path: &str, opts: RequestOptions) -> Result<(), ApiError> {
        ensure_success(self.client.send(path, opts).await?).await?;
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Items(Vec<T>),
    Page { content: Vec<T> },
}

async fn ensure_success(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status { status: status.as_u16(), body })
}
