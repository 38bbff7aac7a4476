//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the directory of the session store file exists.
pub async fn ensure_env(store_path: &str) -> anyhow::Result<()> {
    common::env::ensure_store_dir(store_path).await
}
