//! URL composition for backend requests.

use crate::CoreError;

/// Validate and normalize a backend base URL (scheme required, no trailing slash).
pub fn normalize_base_url(base: &str) -> Result<String, CoreError> {
    let trimmed = base.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(CoreError::InvalidBaseUrl(base.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Join a normalized base URL and a request path.
///
/// Absolute URLs are passed through untouched so callers can hit other hosts.
pub fn join_url(base: &str, path: &str) -> Result<String, CoreError> {
    if path.starts_with("http://") || path.starts_with("https://") {
        return Ok(path.to_string());
    }
    if path.contains("..") {
        return Err(CoreError::InvalidPath(path.to_string()));
    }
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return Ok(base.to_string());
    }
    if path.starts_with('/') {
        Ok(format!("{base}{path}"))
    } else {
        Ok(format!("{base}/{path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slash() {
        assert_eq!(normalize_base_url("http://localhost:8080/api/").unwrap(), "http://localhost:8080/api");
        assert!(normalize_base_url("localhost:8080").is_err());
    }

    #[test]
    fn join_handles_slashes() {
        assert_eq!(join_url("http://h/api", "/jobs").unwrap(), "http://h/api/jobs");
        assert_eq!(join_url("http://h/api/", "jobs").unwrap(), "http://h/api/jobs");
        assert_eq!(join_url("http://h/api", "").unwrap(), "http://h/api");
    }

    #[test]
    fn join_passes_absolute_urls() {
        assert_eq!(join_url("http://h/api", "https://cdn.example.com/x").unwrap(), "https://cdn.example.com/x");
    }

    #[test]
    fn join_rejects_traversal() {
        assert!(join_url("http://h/api", "/../admin").is_err());
    }
}
