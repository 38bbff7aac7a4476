use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the job portal REST backend, e.g. `http://localhost:8080/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), user_agent: default_user_agent() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// JSON file backing the durable session mirror.
    #[serde(default = "default_store_path")]
    pub path: String,
    /// Prefix for every durable key (`<prefix>.user`, `<prefix>.token`, ...).
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: default_store_path(), key_prefix: default_key_prefix() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `compact` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_base_url() -> String { "http://localhost:8080/api".into() }
fn default_user_agent() -> String { concat!("job-portal/", env!("CARGO_PKG_VERSION")).into() }
fn default_store_path() -> String { "data/session.json".into() }
fn default_key_prefix() -> String { "jobportal".into() }
fn default_log_format() -> String { "compact".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is missing, then apply env overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.backend.normalize_from_env();
        self.backend.validate()?;
        self.storage.normalize_from_env();
        self.storage.validate()?;
        self.logging.normalize();
        Ok(())
    }
}

fn is_missing_file(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl BackendConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(url) = std::env::var("PORTAL_API_URL") {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.user_agent.trim().is_empty() {
            self.user_agent = default_user_agent();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(anyhow!("backend.base_url is empty; set it in config.toml or PORTAL_API_URL"));
        }
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("backend.base_url must start with http:// or https://"));
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(path) = std::env::var("PORTAL_STORE_PATH") {
            if !path.trim().is_empty() {
                self.path = path;
            }
        }
        self.key_prefix = self.key_prefix.trim().trim_end_matches('.').to_string();
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!("storage.path is empty"));
        }
        if self.key_prefix.is_empty() {
            return Err(anyhow!("storage.key_prefix is empty"));
        }
        if self.key_prefix.chars().any(char::is_whitespace) {
            return Err(anyhow!("storage.key_prefix must not contain whitespace"));
        }
        Ok(())
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        let f = self.format.trim().to_ascii_lowercase();
        self.format = if f == "json" { f } else { default_log_format() };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = load_from_str("").unwrap();
        assert_eq!(cfg.backend.base_url, "http://localhost:8080/api");
        assert_eq!(cfg.storage.path, "data/session.json");
        assert_eq!(cfg.storage.key_prefix, "jobportal");
        assert_eq!(cfg.logging.format, "compact");
    }

    #[test]
    fn parses_sections() {
        let cfg = load_from_str(
            r#"
            [backend]
            base_url = "https://portal.example.com/api/"

            [storage]
            path = "/tmp/portal/session.json"
            key_prefix = "portal."

            [logging]
            format = "JSON"
            "#,
        )
        .unwrap();
        let mut cfg = cfg;
        cfg.backend.validate().unwrap();
        cfg.storage.key_prefix = cfg.storage.key_prefix.trim_end_matches('.').to_string();
        cfg.logging.normalize();
        assert_eq!(cfg.storage.key_prefix, "portal");
        assert_eq!(cfg.logging.format, "json");
    }

    #[test]
    fn rejects_bad_base_url() {
        let b = BackendConfig { base_url: "localhost:8080".into(), user_agent: "x".into() };
        assert!(b.validate().is_err());
    }

    #[test]
    fn rejects_empty_prefix() {
        let s = StorageConfig { path: "data/s.json".into(), key_prefix: String::new() };
        assert!(s.validate().is_err());
    }

    #[test]
    fn missing_file_is_detected() {
        let path = std::env::temp_dir().join(format!("missing_{}.toml", uuid::Uuid::new_v4()));
        let err = load_from_file(path.to_str().unwrap()).unwrap_err();
        assert!(is_missing_file(&err));
    }
}
