//! Environment/runtime helpers
//!
//! Sanity checks to ensure the session store location is usable at startup.

use std::path::Path;

use tracing::{debug, warn};

/// Ensure the parent directory of the durable session file exists.
pub async fn ensure_store_dir(store_path: &str) -> anyhow::Result<()> {
    let parent = match Path::new(store_path).parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => {
            debug!(%store_path, "session store lives in the working directory");
            return Ok(());
        }
    };
    if tokio::fs::metadata(&parent).await.is_err() {
        warn!(dir = %parent.display(), "session store directory missing; creating it");
    }
    tokio::fs::create_dir_all(&parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    Ok(())
}
